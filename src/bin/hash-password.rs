//! Print an Argon2 hash suitable for `ADMIN_PASSWORD_HASH`.
//!
//! Usage: `cargo run --bin hash-password -- <password>`

use greenline::authentication::hash_password_argon2;

#[tokio::main]
async fn main() {
    let password = match std::env::args().nth(1) {
        Some(password) if !password.is_empty() => password,
        _ => {
            eprintln!("Usage: hash-password <password>");
            std::process::exit(2);
        }
    };

    match hash_password_argon2(password).await {
        Ok(hash) => println!("{hash}"),
        Err(error) => {
            eprintln!("Error: {error:#}");
            std::process::exit(1);
        }
    }
}
