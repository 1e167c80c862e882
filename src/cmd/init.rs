//! `waypoint init` — generate a starter configuration file.
//!
//! Writes a static template config in the requested format. Refuses to
//! overwrite an existing file.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::WaypointError;

const YAML_TEMPLATE: &str = r#"# Waypoint gateway configuration
#
# Routes are evaluated in order; the first matching path predicate wins.
# Each route forwards to a logical backend declared under 'backends'.

backends:
  ACCOUNTS: http://localhost:8081
  CARDS: http://localhost:8082
  LOANS: http://localhost:8083

routes:
  - path: /isoft-bank/accounts/**
    backend: ACCOUNTS
    rewrite:
      pattern: /isoft-bank/accounts/(?<rest>.*)
      template: /${rest}

  - path: /isoft-bank/cards/**
    backend: CARDS
    rewrite:
      pattern: /isoft-bank/cards/(?<rest>.*)
      template: /${rest}

  - path: /isoft-bank/loans/**
    backend: LOANS
    rewrite:
      pattern: /isoft-bank/loans/(?<rest>.*)
      template: /${rest}
"#;

const JSON_TEMPLATE: &str = r#"{
  "backends": {
    "ACCOUNTS": "http://localhost:8081",
    "CARDS": "http://localhost:8082",
    "LOANS": "http://localhost:8083"
  },
  "routes": [
    {
      "path": "/isoft-bank/accounts/**",
      "backend": "ACCOUNTS",
      "rewrite": {
        "pattern": "/isoft-bank/accounts/(?<rest>.*)",
        "template": "/${rest}"
      }
    },
    {
      "path": "/isoft-bank/cards/**",
      "backend": "CARDS",
      "rewrite": {
        "pattern": "/isoft-bank/cards/(?<rest>.*)",
        "template": "/${rest}"
      }
    },
    {
      "path": "/isoft-bank/loans/**",
      "backend": "LOANS",
      "rewrite": {
        "pattern": "/isoft-bank/loans/(?<rest>.*)",
        "template": "/${rest}"
      }
    }
  ]
}
"#;

const TOML_TEMPLATE: &str = r#"# Waypoint gateway configuration
#
# Routes are evaluated in order; the first matching path predicate wins.

[backends]
ACCOUNTS = "http://localhost:8081"
CARDS = "http://localhost:8082"
LOANS = "http://localhost:8083"

[[routes]]
path = "/isoft-bank/accounts/**"
backend = "ACCOUNTS"
rewrite = { pattern = "/isoft-bank/accounts/(?<rest>.*)", template = "/${rest}" }

[[routes]]
path = "/isoft-bank/cards/**"
backend = "CARDS"
rewrite = { pattern = "/isoft-bank/cards/(?<rest>.*)", template = "/${rest}" }

[[routes]]
path = "/isoft-bank/loans/**"
backend = "LOANS"
rewrite = { pattern = "/isoft-bank/loans/(?<rest>.*)", template = "/${rest}" }
"#;

pub fn execute(args: &InitArgs) -> Result<(), WaypointError> {
    let path = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!("waypoint.{}", args.format.extension()))
    });

    if path.exists() {
        return Err(WaypointError::FileExists { path });
    }

    let content = match args.format {
        ConfigFormat::Yaml => YAML_TEMPLATE,
        ConfigFormat::Json => JSON_TEMPLATE,
        ConfigFormat::Toml => TOML_TEMPLATE,
    };

    std::fs::write(&path, content)?;

    println!("\u{2713} Created {}", path.display());
    println!("\n  Next steps:");
    println!("    1. Point the backends at your services");
    println!("    2. waypoint validate {}", path.display());
    println!("    3. waypoint run -c {}", path.display());

    Ok(())
}
