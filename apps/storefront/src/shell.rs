//! # Terminal Shell
//!
//! Line-oriented front end: each input line is parsed with clap and mapped to
//! exactly one command.
//!
//! ## Verbs
//! ```text
//! signin <name>              sign_in
//! signout                    sign_out
//! books [text] [-p bracket]  list_books     (bracket: all, 0-15, 15-30, >30;
//!                                           held copies shown as [N in cart])
//! book <id>                  get_book
//! add <id>                   add_to_cart
//! cart                       get_cart
//! set <id> <quantity>        update_cart_item
//! remove <id>                remove_from_cart
//! clear                      clear_cart
//! dismiss                    dismiss_notice
//! quit                       (leave the shell)
//! ```
//!
//! Double quotes group words, so `books " "` searches for a single space.

use clap::{Parser, Subcommand};
use serde::Serialize;
use shelf_core::BookId;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::commands::cart::AddToCartOutcome;
use crate::commands::catalog::{BookDetail, CatalogPage};
use crate::commands::session::SessionView;
use crate::commands::{cart, catalog, notice, session};
use crate::error::ApiError;
use crate::state::{CartView, ConfigState};
use crate::Storefront;

#[derive(Debug, Parser)]
#[command(name = "shelf", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    verb: Verb,
}

#[derive(Debug, Subcommand)]
enum Verb {
    /// Sign in with a user name (4-16 characters)
    Signin { name: String },

    /// Sign out and forget the stored user name
    Signout,

    /// List books whose title contains TEXT
    Books {
        #[arg(default_value = "")]
        text: String,

        /// Price bracket: all, 0-15, 15-30 or >30
        #[arg(short, long, default_value = "all", allow_hyphen_values = true)]
        price: String,
    },

    /// Show one book
    Book { id: BookId },

    /// Add one copy of a book to the cart
    Add { id: BookId },

    /// Show the cart
    Cart,

    /// Set the quantity of a cart line (0 removes it)
    Set { id: BookId, quantity: u32 },

    /// Remove a book from the cart
    Remove { id: BookId },

    /// Empty the cart
    Clear,

    /// Close the stock notice
    Dismiss,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Result of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    Continue(String),
    Quit,
}

/// Splits an input line into words, grouping double-quoted text.
pub fn split_words(line: &str) -> Result<Vec<String>, ApiError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(ApiError::validation("Unterminated quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Executes shell lines against a [`Storefront`].
pub struct Shell<'a> {
    app: &'a Storefront,
    json: bool,
}

impl<'a> Shell<'a> {
    /// `json` switches output from text to pretty-printed JSON.
    pub fn new(app: &'a Storefront, json: bool) -> Self {
        Shell { app, json }
    }

    pub async fn execute(&self, line: &str) -> ShellOutcome {
        let words = match split_words(line) {
            Ok(words) => words,
            Err(e) => return ShellOutcome::Continue(self.error(&e)),
        };

        let verb = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.verb,
            Err(e) => return ShellOutcome::Continue(e.render().to_string()),
        };

        if matches!(verb, Verb::Quit) {
            return ShellOutcome::Quit;
        }

        let output = match self.dispatch(verb).await {
            Ok(output) => output,
            Err(e) => self.error(&e),
        };
        ShellOutcome::Continue(output)
    }

    async fn dispatch(&self, verb: Verb) -> Result<String, ApiError> {
        let app = self.app;
        let config = &app.config;

        let output = match verb {
            Verb::Signin { name } => {
                let view = session::sign_in(&app.db, &app.session, name).await?;
                self.emit(&view, render_session)
            }
            Verb::Signout => {
                let view = session::sign_out(&app.db, &app.session).await?;
                self.emit(&view, render_session)
            }
            Verb::Books { text, price } => {
                let page =
                    catalog::list_books(&app.db, &app.catalog, &app.session, config, text, price)
                        .await?;
                self.emit(&page, render_page)
            }
            Verb::Book { id } => {
                let detail = catalog::get_book(&app.catalog, &app.session, config, id).await?;
                self.emit(&detail, render_detail)
            }
            Verb::Add { id } => {
                let outcome =
                    cart::add_to_cart(&app.db, &app.catalog, &app.session, &app.notices, config, id)
                        .await?;
                return Ok(self.emit(&outcome, |o| render_add(o, config)));
            }
            Verb::Cart => {
                let view = cart::get_cart(&app.db, &app.catalog, &app.session, config).await?;
                self.emit(&view, |v| render_cart(v, config))
            }
            Verb::Set { id, quantity } => {
                let view =
                    cart::update_cart_item(&app.db, &app.catalog, &app.session, config, id, quantity)
                        .await?;
                self.emit(&view, |v| render_cart(v, config))
            }
            Verb::Remove { id } => {
                let view =
                    cart::remove_from_cart(&app.db, &app.catalog, &app.session, config, id).await?;
                self.emit(&view, |v| render_cart(v, config))
            }
            Verb::Clear => {
                let view = cart::clear_cart(&app.db, &app.catalog, &app.session, config).await?;
                self.emit(&view, |v| render_cart(v, config))
            }
            Verb::Dismiss => {
                let dismissed = notice::dismiss_notice(&app.notices).await;
                return Ok(match (self.json, dismissed) {
                    (true, dismissed) => to_json(&dismissed),
                    (false, Some(_)) => "Notice dismissed".to_string(),
                    (false, None) => "No notice to dismiss".to_string(),
                });
            }
            Verb::Quit => String::new(),
        };

        Ok(self.with_banner(output).await)
    }

    /// Prefixes text output with the active stock notice.
    async fn with_banner(&self, output: String) -> String {
        if self.json {
            return output;
        }
        match notice::current_notice(&self.app.notices).await {
            Some(active) => format!("! {}\n{}", active.message, output),
            None => output,
        }
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> String {
        if self.json {
            to_json(value)
        } else {
            text(value)
        }
    }

    fn error(&self, err: &ApiError) -> String {
        if self.json {
            to_json(err)
        } else {
            format!("error: {}", err.message)
        }
    }

    /// Prompt showing the store and the signed-in user.
    pub async fn prompt(&self) -> String {
        let user = self
            .app
            .session
            .current()
            .await
            .unwrap_or_else(|| "guest".to_string());
        format!("{} [{}]> ", self.app.config.store_name, user)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"code\":\"INTERNAL\",\"message\":\"{}\"}}", e))
}

// =============================================================================
// Text Rendering
// =============================================================================

fn render_session(view: &SessionView) -> String {
    match &view.user_name {
        Some(name) => format!("Signed in as {}", name),
        None => "Signed out".to_string(),
    }
}

fn render_page(page: &CatalogPage) -> String {
    let mut out = String::new();
    for card in &page.books {
        out.push_str(&format!(
            "{:>4}  {:<27}  {:<22}  {:>9}",
            card.id, card.title, card.author, card.price_label
        ));
        if card.in_cart > 0 {
            out.push_str(&format!("  [{} in cart]", card.in_cart));
        }
        out.push('\n');
    }
    out.push_str(&format!("{} of {} books", page.books.len(), page.catalog_size));
    if page.filters_active {
        out.push_str(" (filtered)");
    }
    out
}

fn render_detail(detail: &BookDetail) -> String {
    let mut out = format!(
        "{}\nby {}\n{}  ({} in stock)\ncover: {}",
        detail.title, detail.author, detail.price_label, detail.amount, detail.image
    );
    if let Some(description) = &detail.description {
        out.push_str(&format!("\n\n{}", description));
    }
    out
}

fn render_cart(view: &CartView, config: &ConfigState) -> String {
    if view.is_empty() {
        return format!("Cart ({}) is empty", view.owner);
    }

    let mut out = format!("Cart ({})\n", view.owner);
    for line in &view.lines {
        out.push_str(&format!(
            "{:>4}  {:<27}  x{:<3} {:>9}  {:>9}\n",
            line.book_id,
            line.title,
            line.quantity,
            config.format_currency(line.unit_price),
            config.format_currency(line.line_total)
        ));
    }
    out.push_str(&format!(
        "{} items, total {}",
        view.totals.total_quantity,
        config.format_currency(view.totals.total_amount)
    ));
    out
}

fn render_add(outcome: &AddToCartOutcome, config: &ConfigState) -> String {
    match outcome {
        AddToCartOutcome::Added { cart } => format!(
            "Added. Cart now holds {} items, total {}",
            cart.totals.total_quantity,
            config.format_currency(cart.totals.total_amount)
        ),
        AddToCartOutcome::OutOfStock { notice } => format!("! {}", notice.message),
    }
}

// =============================================================================
// Interactive Loop
// =============================================================================

/// Reads commands from stdin until `quit` or end of input.
pub async fn run_shell(app: &Storefront, json: bool) -> std::io::Result<()> {
    let shell = Shell::new(app, json);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(shell.prompt().await.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match shell.execute(&line).await {
            ShellOutcome::Continue(output) => {
                stdout.write_all(output.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            ShellOutcome::Quit => break,
        }
    }

    stdout.flush().await
}
