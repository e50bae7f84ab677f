//! qcert: Command-line inspector for eIDAS qualified certificates.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use qcert_lib::{iso8601, CertificateRevocationList, Severity, X509Certificate};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "qcert",
    about = "Decode X.509 certificates and evaluate eIDAS qualified-certificate semantics",
    long_about = "qcert decodes X.509 v3 certificates in PEM, base64, or DER form,\n\
                  reports their extensions and eIDAS qcStatements, and can link a\n\
                  certificate to candidate issuers by name, key identifier, and\n\
                  signature verification."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display a certificate's attribute report
    Show {
        /// Certificate file (PEM, base64, or DER). Reads from stdin if omitted.
        file: Option<PathBuf>,
        /// Output the full report as pretty-printed JSON
        #[arg(long)]
        json: bool,
        /// DER-encoded CRL to check the certificate's serial against
        #[arg(long)]
        crl: Option<PathBuf>,
    },
    /// Link a certificate to candidate issuers and report the accepted chain
    Chain {
        /// Subject certificate file
        cert: PathBuf,
        /// Candidate issuer certificate files, tried in order
        issuers: Vec<PathBuf>,
        /// Output the chained report as pretty-printed JSON
        #[arg(long)]
        json: bool,
    },
    /// List the eIDAS qcStatements carried by a certificate
    Qc {
        /// Certificate file
        file: PathBuf,
    },
    /// Re-emit a certificate as PEM
    Pem {
        /// Certificate file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Show { file, json, crl } => show(file.as_deref(), json, crl.as_deref()),
        Commands::Chain { cert, issuers, json } => chain(&cert, &issuers, json),
        Commands::Qc { file } => qc(&file),
        Commands::Pem { file } => pem(&file),
    }
}

fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn load_certificate(file: Option<&Path>) -> Result<X509Certificate> {
    let input = read_input(file)?;
    match X509Certificate::from_bytes(&input)? {
        Some(cert) => Ok(cert),
        None => bail!("not an X.509 v3 certificate"),
    }
}

fn show(file: Option<&Path>, json: bool, crl: Option<&Path>) -> Result<()> {
    let mut cert = load_certificate(file)?;

    if let Some(crl_path) = crl {
        let crl_bytes = read_input(Some(crl_path))?;
        let crl = CertificateRevocationList::from_bytes(&crl_bytes)?;
        cert.bind_crl(Arc::new(crl));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&cert.attributes()?)?);
        return Ok(());
    }

    println!("Subject:      {}", cert.subject_dn()?);
    println!("Issuer:       {}", cert.issuer_dn()?);
    println!("Serial:       {}", cert.serial_decimal());
    println!("Not Before:   {}", iso8601(cert.not_before()));
    println!("Not After:    {}", iso8601(cert.not_after()));
    println!("Fingerprint:  {}", cert.fingerprint());
    println!(
        "CA:           {}{}",
        cert.is_ca(),
        match cert.path_length() {
            Some(len) => format!(" (pathLen {})", len),
            None => String::new(),
        }
    );
    if let Some(ku) = cert.key_usage() {
        println!("Key Usage:    {}", ku.names().join(", "));
    }
    for uri in cert.ocsp_uris() {
        println!("OCSP:         {}", uri);
    }
    for uri in cert.issuer_uris() {
        println!("CA Issuers:   {}", uri);
    }
    for uri in cert.crl_distribution_points() {
        println!("CRL:          {}", uri);
    }
    if cert.has_qc_statements() {
        println!("QC:           {}", cert.qc_statement_names().join(", "));
    }
    if let Some(revoked) = cert.is_revoked() {
        println!("Revoked:      {}", revoked);
    }
    for finding in cert.findings() {
        let marker = match finding.severity {
            Severity::Critical => "!!",
            Severity::Warning => " !",
        };
        println!("{} [{}] {}", marker, finding.component, finding.message);
    }
    Ok(())
}

fn chain(cert_path: &Path, issuer_paths: &[PathBuf], json: bool) -> Result<()> {
    let mut cert = load_certificate(Some(cert_path))?;

    for issuer_path in issuer_paths {
        let issuer_bytes = read_input(Some(issuer_path))?;
        match cert.accept_issuer(issuer_bytes.as_slice())? {
            Some(issuer) => println!(
                "accepted: {} ({})",
                issuer.subject_dn()?,
                issuer_path.display()
            ),
            None => println!("rejected: {}", issuer_path.display()),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&cert.attributes()?)?);
    } else if cert.issuers().is_empty() {
        bail!("no candidate issuer accepted");
    }
    Ok(())
}

fn qc(file: &Path) -> Result<()> {
    let cert = load_certificate(Some(file))?;
    let ctx = cert.context();
    match cert.qc_statements() {
        Some(statements) => {
            for statement in &statements.statements {
                println!("{}: {}", statement.name(), statement.description(Some(&ctx)));
            }
        }
        None => println!("no qcStatements extension"),
    }
    Ok(())
}

fn pem(file: &Path) -> Result<()> {
    let cert = load_certificate(Some(file))?;
    print!("{}", cert.to_pem());
    Ok(())
}
