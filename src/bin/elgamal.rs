use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use elgamal_toolkit::cs::security::elgamal::{
    self, parse_biguint, Ciphertext, DomainParameters, ElGamalCipher, ElGamalSession,
};
use env_logger::Env;
use log::{debug, LevelFilter};
use num_bigint_dig::BigUint;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "elgamal",
    author,
    version,
    about = "Toy ElGamal text encryption over a prime field"
)]
struct Cli {
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest prime moduli large enough for every character of a text.
    Suggest {
        #[arg(long, value_name = "TEXT")]
        text: Option<String>,
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Pick a generator and draw a key pair for modulus `p`.
    Keygen {
        #[arg(long)]
        p: String,
        #[arg(long)]
        g: Option<String>,
    },
    /// Encrypt a text; prints the JSON ciphertext.
    Encrypt {
        #[arg(long)]
        p: String,
        #[arg(long)]
        g: String,
        #[arg(long)]
        y: String,
        /// Ephemeral scalar; drawn fresh when absent or outside [2, p-2].
        #[arg(long)]
        k: Option<String>,
        #[arg(long, value_name = "TEXT")]
        text: Option<String>,
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Decrypt a JSON ciphertext with private key `x`.
    Decrypt {
        #[arg(long)]
        p: String,
        #[arg(long)]
        x: String,
        #[arg(long, value_name = "JSON")]
        cipher: Option<String>,
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Run analyse, keygen, encrypt and decrypt on one text in a single session.
    Demo {
        #[arg(long, value_name = "TEXT")]
        text: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match cli.command {
        Commands::Suggest { text, input } => cmd_suggest(resolve_text(text, input.as_deref())?),
        Commands::Keygen { p, g } => cmd_keygen(&p, g.as_deref()),
        Commands::Encrypt {
            p,
            g,
            y,
            k,
            text,
            input,
            out,
        } => cmd_encrypt(
            &p,
            &g,
            &y,
            k.as_deref(),
            resolve_text(text, input.as_deref())?,
            out.as_deref(),
        ),
        Commands::Decrypt {
            p,
            x,
            cipher,
            input,
        } => cmd_decrypt(&p, &x, resolve_text(cipher, input.as_deref())?),
        Commands::Demo { text } => cmd_demo(&text),
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn cmd_suggest(text: String) -> Result<()> {
    let suggestion = elgamal::suggest_domain_parameters(&text)?;
    println!("Largest code point in text: {}", suggestion.max_code_point);
    let moduli: Vec<String> = suggestion.candidates.iter().map(|p| p.to_string()).collect();
    println!("Suggested p: {}", moduli.join(", "));
    Ok(())
}

fn cmd_keygen(p: &str, g: Option<&str>) -> Result<()> {
    let p = parse_biguint("p", p)?;
    let params = match g {
        Some(g) => DomainParameters::new(p, parse_biguint("g", g)?)?,
        None => DomainParameters::with_default_generator(p)?,
    };
    let keys = ElGamalCipher::new().generate_keypair(&params)?;
    println!("p = {}", params.p);
    println!("g = {}", params.g);
    println!("x = {}", keys.private_key());
    println!("y = {}", keys.public_key());
    Ok(())
}

fn cmd_encrypt(
    p: &str,
    g: &str,
    y: &str,
    k: Option<&str>,
    text: String,
    out: Option<&Path>,
) -> Result<()> {
    let p = parse_biguint("p", p)?;
    let g = parse_biguint("g", g)?;
    let y = parse_biguint("y", y)?;
    let k = k.map(|k| parse_biguint("k", k)).transpose()?;

    let ciphertext = elgamal::encrypt_text(&p, &g, Some(&y), k.as_ref(), &text)?;
    debug!("encrypted {} symbols", ciphertext.len());
    let json = ciphertext.to_json()?;
    match out {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("writing ciphertext to {}", path.display()))?;
            println!("Wrote {} pairs to {}", ciphertext.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_decrypt(p: &str, x: &str, json: String) -> Result<()> {
    let p = parse_biguint("p", p)?;
    let x = parse_biguint("x", x)?;
    let ciphertext = Ciphertext::from_json(&json).context("parsing ciphertext")?;
    let text = elgamal::decrypt_text(&p, &x, &ciphertext)?;
    println!("{}", text);
    Ok(())
}

fn cmd_demo(text: &str) -> Result<()> {
    let mut session = ElGamalSession::new();
    let suggestion = session.analyze_text(text)?;
    println!(
        "max code point {} -> p = {}",
        suggestion.max_code_point,
        suggestion.modulus()
    );
    session.generate_all()?;
    let y = session.generate_public_key()?.clone();
    println!("g = {}, y = {}", display(session.g()), y);

    let json = session.encrypt_text(text)?.to_json()?;
    println!("ciphertext: {}", json);
    let recovered = session.decrypt_json(&json)?.to_string();
    println!("decrypted: {}", recovered);
    if recovered != text {
        bail!("round trip mismatch");
    }
    Ok(())
}

fn resolve_text(inline: Option<String>, file: Option<&Path>) -> Result<String> {
    match (inline, file) {
        (Some(text), None) => Ok(text),
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        (Some(_), Some(_)) => bail!("pass either inline text or --input, not both"),
        (None, None) => bail!("no input given"),
    }
}

fn display(value: Option<&BigUint>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
