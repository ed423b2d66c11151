//! Prints a bcrypt hash for `ADMIN_PASSWORD_HASH`.

use portfolio_api::auth::password::hash_password;
use std::env;

fn main() {
    let password = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --bin hash-password <PASSWORD>");
        std::process::exit(1);
    });

    match hash_password(&password) {
        Ok(hashed) => {
            println!("# Paste this into your .env:");
            println!("ADMIN_PASSWORD_HASH={}", hashed);
        }
        Err(e) => {
            eprintln!("Error hashing password: {}", e);
            std::process::exit(1);
        }
    }
}
