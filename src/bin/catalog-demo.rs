//! catalog-demo: seed the sample catalog and print the aggregate reads.
//!
//! ```bash
//! catalog-demo                       # uses ./catalog.toml, created if missing
//! catalog-demo --config other.toml --json
//! RUST_LOG=catalog=debug catalog-demo --inline
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgAction, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog::{
    format_price, sample, BrandPackage, Catalog, CatalogConfig, Category, DeliveryMode,
    LowestHighestPricedProducts, LowestPricedProducts, Product, Result, CONFIG_FILE_NAME,
};

fn build_cli() -> Command {
    Command::new("catalog-demo")
        .about("Seed a sample brand catalog and print its price aggregates")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Config file (default: ./catalog.toml, created if missing)"),
        )
        .arg(
            Arg::new("inline")
                .long("inline")
                .help("Handle brand events on the writing thread")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue),
        )
}

fn load_config(path: Option<&String>) -> Result<CatalogConfig> {
    let path = path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    CatalogConfig::write_default_if_missing(&path)?;
    CatalogConfig::from_file(&path)
}

fn init_tracing(config: &CatalogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn product_line(product: &Product) -> String {
    format!(
        "  {:<6} {:<4} {:>10}",
        product.category.label(),
        product.brand.name,
        format_price(product.price)
    )
}

fn print_lowest_priced(result: &LowestPricedProducts) {
    println!("Cheapest product per category");
    for product in &result.products {
        println!("{}", product_line(product));
    }
    println!("  total {:>16}", format_price(result.total_price));
}

fn print_package(result: &BrandPackage) {
    println!(
        "Cheapest brand package: {} ({})",
        result.brand.name,
        format_price(result.total_price)
    );
    for product in &result.products {
        println!("{}", product_line(product));
    }
}

fn print_extremes(result: &LowestHighestPricedProducts) {
    println!("{} price range", result.category.label());
    for product in &result.lowest {
        println!("  lowest  {:<4} {:>10}", product.brand.name, format_price(product.price));
    }
    for product in &result.highest {
        println!("  highest {:<4} {:>10}", product.brand.name, format_price(product.price));
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| catalog::Error::invalid_input(format!("Failed to encode output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn run() -> Result<()> {
    let matches = build_cli().get_matches();

    let mut config = load_config(matches.get_one::<String>("config"))?;
    if matches.get_flag("inline") {
        config.delivery = DeliveryMode::Inline;
    }
    init_tracing(&config);

    let catalog = Catalog::in_memory(config)?;
    let brands = sample::seed(catalog.service())?;
    catalog.drain_events();
    info!(target: "catalog::demo", brands = brands.len(), "Sample catalog seeded");

    let service = catalog.service();
    let lowest = service.lowest_priced_products()?;
    let package = service.lowest_total_priced_brand_package()?;
    let extremes = service.lowest_highest_priced_products(Category::Top)?;

    if matches.get_flag("json") {
        print_json(&lowest)?;
        print_json(&package)?;
        print_json(&extremes)?;
    } else {
        print_lowest_priced(&lowest);
        println!();
        print_package(&package);
        println!();
        print_extremes(&extremes);
    }

    catalog.shutdown();
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
