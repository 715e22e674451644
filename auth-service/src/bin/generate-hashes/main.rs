//! Produces seed rows for the `users` table.
//!
//! ```text
//! generate-hashes alice:correcthorse bob:hunter2
//! generate-hashes --scheme argon2id alice:correcthorse
//! ```

use auth::password::hasher::DEFAULT_BCRYPT_COST;
use auth::HashScheme;
use auth::PasswordHasher;
use clap::Parser;
use clap::ValueEnum;

#[derive(Parser, Debug)]
#[command(name = "generate-hashes")]
#[command(about = "Hash passwords and print an INSERT statement for the users table", long_about = None)]
struct Cli {
    /// Hash scheme for new hashes
    #[arg(long, value_enum, default_value_t = Scheme::Bcrypt)]
    scheme: Scheme,

    /// bcrypt cost factor (ignored for argon2id)
    #[arg(long, default_value_t = DEFAULT_BCRYPT_COST)]
    cost: u32,

    /// Credentials as username:password (the password may contain ':')
    #[arg(required = true, value_parser = parse_pair)]
    credentials: Vec<Credential>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Bcrypt,
    Argon2id,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Credential {
    username: String,
    password: String,
}

fn parse_pair(raw: &str) -> Result<Credential, String> {
    let (username, password) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected username:password, got '{raw}'"))?;

    if username.is_empty() || password.is_empty() {
        return Err("username and password must not be empty".to_string());
    }

    Ok(Credential {
        username: username.to_string(),
        password: password.to_string(),
    })
}

fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn insert_statement(rows: &[(String, String)]) -> String {
    let values = rows
        .iter()
        .map(|(username, hash)| format!("    ({}, {})", sql_literal(username), sql_literal(hash)))
        .collect::<Vec<_>>()
        .join(",\n");

    format!("INSERT INTO users (username, password_hash) VALUES\n{values};")
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let scheme = match cli.scheme {
        Scheme::Bcrypt => HashScheme::Bcrypt { cost: cli.cost },
        Scheme::Argon2id => HashScheme::Argon2id,
    };
    let hasher = PasswordHasher::with_scheme(scheme);

    let rows = cli
        .credentials
        .iter()
        .map(|credential| {
            hasher
                .hash(&credential.password)
                .map(|hash| (credential.username.clone(), hash))
        })
        .collect::<Result<Vec<_>, _>>()?;

    println!("{}", insert_statement(&rows));
    println!();

    let mut all_verified = true;
    for (credential, (_, hash)) in cli.credentials.iter().zip(&rows) {
        let verified = hasher.verify(&credential.password, hash)?;
        all_verified &= verified;
        println!(
            "-- {}: {}",
            credential.username,
            if verified { "verified" } else { "MISMATCH" }
        );
    }

    if !all_verified {
        anyhow::bail!("one or more generated hashes failed verification");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair_keeps_colons_in_password() {
        assert_eq!(
            parse_pair("alice:a:b:c"),
            Ok(Credential {
                username: "alice".to_string(),
                password: "a:b:c".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_pair_rejects_malformed() {
        assert!(parse_pair("alice").is_err());
        assert!(parse_pair(":pw").is_err());
        assert!(parse_pair("alice:").is_err());
    }

    #[test]
    fn test_insert_statement_escapes_quotes() {
        let sql = insert_statement(&[
            ("alice".to_string(), "$2b$10$abc".to_string()),
            ("o'brien".to_string(), "$2b$10$def".to_string()),
        ]);

        assert_eq!(
            sql,
            "INSERT INTO users (username, password_hash) VALUES\n    ('alice', '$2b$10$abc'),\n    ('o''brien', '$2b$10$def');"
        );
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["generate-hashes", "alice:pw"]).unwrap();
        assert_eq!(cli.scheme, Scheme::Bcrypt);
        assert_eq!(cli.cost, 10);
        assert_eq!(cli.credentials.len(), 1);
    }

    #[test]
    fn test_cli_requires_credentials() {
        assert!(Cli::try_parse_from(["generate-hashes"]).is_err());
    }
}
