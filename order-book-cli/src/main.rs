//! # Order Book CLI
//!
//! A command-line interface for interacting with the order book.
//!
//! This CLI provides commands to place orders, query book state, and run an
//! interactive mode.

use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use order_book_core::config::OrderBookConfig;
use order_book_core::order::NewOrderRequest;
use order_book_core::order_book::OrderBook;
use order_book_core::order_type::TimeCondition;
use order_book_core::side::Side;
use order_book_core::timestamp::Timestamp;
use order_book_core::Order;

#[derive(Parser)]
#[command(name = "order-book-cli")]
#[command(about = "A limit order book CLI", long_about = None)]
struct Cli {
    /// Trading symbol
    #[arg(long, default_value = "BTCUSD")]
    symbol: String,

    /// Smallest legal price increment
    #[arg(long, default_value = "0.01")]
    tick_price: f64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Place an order in the book
    #[command(name = "place-order")]
    PlaceOrder {
        side: Side,
        price: f64,
        quantity: u64,
        id: String,
        #[arg(long, default_value = "gtc")]
        tif: String,
    },
    /// Place a buy order (interactive mode)
    #[command(name = "buy")]
    Buy { price: f64, quantity: u64, id: Option<String> },
    /// Place a sell order (interactive mode)
    #[command(name = "sell")]
    Sell { price: f64, quantity: u64, id: Option<String> },
    /// Show current order book state
    #[command(name = "book", aliases = ["state", "b"])]
    Book,
    /// Show best bid and ask prices
    #[command(name = "best")]
    Best,
    /// Get the best buy price
    #[command(name = "best-buy")]
    BestBuy,
    /// Get the best sell price
    #[command(name = "best-sell")]
    BestSell,
    /// Show market depth
    #[command(name = "depth")]
    Depth {
        #[arg(default_value = "5")]
        levels: usize,
    },
    /// Cancel a resting order
    #[command(name = "cancel")]
    Cancel { id: String },
    /// Clear the order book (interactive mode)
    #[command(name = "clear")]
    Clear,
    /// Exit interactive mode
    #[command(name = "quit", aliases = ["exit", "q"])]
    Quit,
    /// Start interactive mode
    #[command(name = "interactive")]
    Interactive,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = OrderBookConfig::unbounded(cli.symbol, cli.tick_price).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    });

    match cli.command {
        None => run_interactive_mode(config),
        Some(Commands::PlaceOrder { side, price, quantity, id, tif }) => {
            let mut book = OrderBook::new(config);
            match place_order(&mut book, side, price, quantity, id, &tif) {
                Ok(report) => {
                    if report.fills.is_empty() {
                        println!("Order placed. No trades executed.");
                    } else {
                        println!("Order executed! Trades:");
                        for fill in &report.fills {
                            println!(
                                "Trade: {} @ {} (maker: {}, taker: {})",
                                fill.qty, fill.price, fill.maker_order_id, fill.taker_order_id
                            );
                        }
                    }
                }
                Err(e) => {
                    eprintln!("Error placing order: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::BestBuy) => {
            let book = OrderBook::new(config);
            println!("Best buy: {}", book.best_bid());
        }
        Some(Commands::BestSell) => {
            let book = OrderBook::new(config);
            println!("Best sell: {}", book.best_ask());
        }
        Some(Commands::Interactive) => run_interactive_mode(config),
        Some(
            Commands::Buy { .. }
            | Commands::Sell { .. }
            | Commands::Book
            | Commands::Best
            | Commands::Depth { .. }
            | Commands::Cancel { .. }
            | Commands::Clear
            | Commands::Quit,
        ) => {
            eprintln!("This command is only available in interactive mode.");
            eprintln!("Use: cargo run --bin order-book-cli -- interactive");
            std::process::exit(1);
        }
    }
}

fn parse_interactive_command(input: &str) -> Result<Commands, String> {
    let args = shlex::split(input).ok_or("Invalid command syntax")?;
    if args.is_empty() {
        return Err("Empty command".to_string());
    }

    let mut full_args = vec!["order-book-cli".to_string()];
    full_args.extend(args);

    match Cli::try_parse_from(full_args) {
        Ok(cli) => cli.command.ok_or_else(|| "Interactive mode not available within interactive mode".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn run_interactive_mode(config: OrderBookConfig) {
    println!("=== Order Book Interactive CLI ===");
    println!("Type 'help' for available commands, 'quit' to exit\n");

    let mut book = OrderBook::new(config.clone());
    println!("Symbol: {}  tick: {}\n", book.symbol(), book.tick_price());

    let mut next_id = 1u64;

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_interactive_command(trimmed) {
                    Ok(Commands::Quit) => {
                        println!("Goodbye!");
                        break;
                    }
                    Ok(Commands::Buy { price, quantity, id }) => {
                        let order_id = id.unwrap_or_else(|| next_order_id(&mut next_id));
                        report_placement(place_order(&mut book, Side::Buy, price, quantity, order_id, "gtc"));
                        print_book_summary(&book);
                    }
                    Ok(Commands::Sell { price, quantity, id }) => {
                        let order_id = id.unwrap_or_else(|| next_order_id(&mut next_id));
                        report_placement(place_order(&mut book, Side::Sell, price, quantity, order_id, "gtc"));
                        print_book_summary(&book);
                    }
                    Ok(Commands::Cancel { id }) => match book.cancel(&id) {
                        Ok(order) => println!("Cancelled {}", order.order_id),
                        Err(e) => println!("Error: {e}"),
                    },
                    Ok(Commands::Book) => print_book_state(&book),
                    Ok(Commands::Best) => print_best_prices(&book),
                    Ok(Commands::Clear) => {
                        book = OrderBook::new(config.clone());
                        next_id = 1;
                        println!("Order book cleared.");
                    }
                    Ok(Commands::Depth { levels }) => print_market_depth(&book, levels),
                    Ok(Commands::PlaceOrder { .. } | Commands::BestBuy | Commands::BestSell | Commands::Interactive) => {
                        println!("Command not available in interactive mode.");
                    }
                    Err(e) => {
                        if trimmed == "help" || trimmed == "h" {
                            show_help();
                        } else {
                            println!("Error: {}", e.lines().next().unwrap_or("Invalid command"));
                        }
                    }
                }
            }
            Err(error) => {
                println!("Error reading input: {error}");
                break;
            }
        }
    }
}

fn next_order_id(next_id: &mut u64) -> String {
    let id = *next_id;
    *next_id += 1;
    id.to_string()
}

fn report_placement(result: Result<order_book_core::PlaceReport, String>) {
    match result {
        Ok(report) => {
            if report.fills.is_empty() {
                println!("Order {} placed. No trades executed.", report.order.order_id);
            } else {
                println!("Order {} executed! Trades:", report.order.order_id);
                for fill in &report.fills {
                    println!("  Trade: {} @ {} (maker: {}, taker: {})", fill.qty, fill.price, fill.maker_order_id, fill.taker_order_id);
                }
            }
        }
        Err(e) => println!("Error: {e}"),
    }
}

fn show_help() {
    println!("Available Commands:");
    println!("  buy <price> <quantity> [id]    - Place a buy order (e.g., buy 100.50 10)");
    println!("  sell <price> <quantity> [id]   - Place a sell order (e.g., sell 100.25 15)");
    println!("  cancel <id>                    - Cancel a resting order");
    println!("  book | state | b               - Show current order book state");
    println!("  best                           - Show best bid and ask prices");
    println!("  depth [levels]                 - Show market depth (default: 5 levels)");
    println!("  clear                          - Clear the order book");
    println!("  help | h                       - Show this help message");
    println!("  quit | exit | q                - Exit the CLI");
    println!();
}

fn place_order(
    book: &mut OrderBook,
    side: Side,
    price: f64,
    quantity: u64,
    id: String,
    tif: &str,
) -> Result<order_book_core::PlaceReport, String> {
    let time_in_force = TimeCondition::parse(tif).map_err(|e| e.to_string())?;
    let request = NewOrderRequest::limit(id, book.symbol(), side, price, quantity).time_in_force(time_in_force);
    let now_millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    let order = Order::from_request(request, Timestamp::from_millis(now_millis)).map_err(|e| e.to_string())?;
    book.place(order).map_err(|e| e.to_string())
}

fn print_book_state(book: &OrderBook) {
    println!("\nOrder Book State:");
    print_best_prices(book);
    print_market_depth(book, 3);
    println!();
}

fn print_best_prices(book: &OrderBook) {
    println!("  Best BUY:  {}", book.best_bid());
    println!("  Best SELL: {}", book.best_ask());
    println!("  Spread:    {}", book.spread());
}

fn print_market_depth(book: &OrderBook, levels: usize) {
    let sell_depth = book.top(Side::Sell, levels);
    let buy_depth = book.top(Side::Buy, levels);

    if !sell_depth.is_empty() || !buy_depth.is_empty() {
        println!("  Market Depth:");
        for price in sell_depth.iter().rev() {
            if let Some(level) = book.level_at(*price) {
                println!("    ASK {} @ {}", level.size(), price);
            }
        }
        if !sell_depth.is_empty() && !buy_depth.is_empty() {
            println!("    ---------------");
        }
        for price in &buy_depth {
            if let Some(level) = book.level_at(*price) {
                println!("    BID {} @ {}", level.size(), price);
            }
        }
    }
}

fn print_book_summary(book: &OrderBook) {
    println!("Best: {} | {}", book.best_bid(), book.best_ask());
}
