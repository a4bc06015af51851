use clap::{ArgAction, Parser, Subcommand};
use simple_sign::{Algorithm, ArtifactStore, Config, ErrorKind, SignError, Signer, Verifier};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "simple-sign", version, about = "Sign documents and verify detached signatures")]
struct Cli {
    /// TOML config file (defaults to $SIMPLE_SIGN_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign a document, writing <DOCUMENT>.sig and <DOCUMENT>.pk
    Sign {
        document: PathBuf,

        /// ed25519 or ecdsa-p256
        #[arg(long, value_parser = parse_algorithm)]
        algorithm: Option<Algorithm>,

        /// Also write the <DOCUMENT>.sig.json envelope
        #[arg(long)]
        envelope: bool,

        /// Signer label recorded in the envelope
        #[arg(long)]
        signer_id: Option<String>,
    },
    /// Verify a document against its signature and public key files
    Verify {
        document: PathBuf,

        /// Signature file (defaults to <DOCUMENT>.sig)
        #[arg(long)]
        signature: Option<PathBuf>,

        /// Public key file (defaults to <DOCUMENT>.pk)
        #[arg(long)]
        public_key: Option<PathBuf>,
    },
    /// Verify a document against a JSON envelope
    VerifyEnvelope {
        document: PathBuf,

        /// Envelope file (defaults to <DOCUMENT>.sig.json)
        #[arg(long)]
        envelope: Option<PathBuf>,
    },
}

enum Outcome {
    Done,
    Invalid,
}

fn parse_algorithm(s: &str) -> Result<Algorithm, String> {
    s.parse().map_err(|e: SignError| e.to_string())
}

fn init_logging(verbose: u8, config: Option<&Config>) {
    let default_filter = match verbose {
        0 => config
            .and_then(|c| c.log_level.clone())
            .unwrap_or_else(|| "warn".to_string()),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(command: Command, config: &Config) -> simple_sign::Result<Outcome> {
    match command {
        Command::Sign {
            document,
            algorithm,
            envelope,
            signer_id,
        } => {
            let mut signer = Signer::new().with_algorithm(algorithm.unwrap_or(config.algorithm));
            if let Some(signer_id) = signer_id.or_else(|| config.signer_id.clone()) {
                signer = signer.with_signer_id(signer_id);
            }

            if envelope || config.envelope {
                let (artifacts, envelope_path) = signer.sign_document_enveloped(&document)?;
                println!("signature:  {}", artifacts.signature_path.display());
                println!("public key: {}", artifacts.public_key_path.display());
                println!("envelope:   {}", envelope_path.display());
            } else {
                let artifacts = signer.sign_document(&document)?;
                println!("signature:  {}", artifacts.signature_path.display());
                println!("public key: {}", artifacts.public_key_path.display());
            }
            Ok(Outcome::Done)
        }
        Command::Verify {
            document,
            signature,
            public_key,
        } => {
            let signature = signature.unwrap_or_else(|| ArtifactStore::signature_path_for(&document));
            let public_key = public_key.unwrap_or_else(|| ArtifactStore::public_key_path_for(&document));
            let valid = Verifier::verify_signature(&signature, &public_key, &document)?;
            Ok(report(valid))
        }
        Command::VerifyEnvelope { document, envelope } => {
            let envelope = envelope.unwrap_or_else(|| ArtifactStore::envelope_path_for(&document));
            let valid = Verifier::verify_envelope(&envelope, &document)?;
            Ok(report(valid))
        }
    }
}

fn report(valid: bool) -> Outcome {
    if valid {
        println!("valid");
        Outcome::Done
    } else {
        println!("INVALID: signature does not match this document and key");
        Outcome::Invalid
    }
}

fn category(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Configuration => "configuration",
        ErrorKind::Io => "i/o",
        ErrorKind::MalformedArtifact => "malformed artifact",
        ErrorKind::KeyMismatch => "key mismatch",
        ErrorKind::Signing => "signing",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref());
    init_logging(cli.verbose, config.as_ref().ok());
    match Config::source_path(cli.config.as_deref()) {
        Some(path) => log::debug!("config file {}", path.display()),
        None => log::debug!("no config file, using defaults and environment"),
    }

    match config.and_then(|config| run(cli.command, &config)) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Invalid) => ExitCode::from(1),
        Err(e) => {
            log::debug!("{:?}", e);
            eprintln!("error ({}): {}", category(e.kind()), e);
            ExitCode::from(2)
        }
    }
}
