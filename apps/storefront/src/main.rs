//! # Shelf Storefront Entry Point
//!
//! ```text
//! $ shelf-storefront --db ./shelf.db
//! Shelf Books [guest]> signin alice
//! Signed in as alice
//! Shelf Books [alice]> books neuro
//!    3  Neuromancer                  William Gibson             $22.00
//! 1 of 8 books (filtered)
//! Shelf Books [alice]> add 3
//! Added. Cart now holds 1 items, total $22.00
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use clap::Parser;
use shelf_storefront::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = shelf_storefront::run(cli).await {
        eprintln!("error: {}", e.message);
        std::process::exit(1);
    }
}
