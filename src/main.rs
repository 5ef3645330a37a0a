//! CLI entry point: fetch delivery addresses from a platform and plan a route.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use delivery_routing::export::export_route_csv;
use delivery_routing::lazada::LazadaConfig;
use delivery_routing::planner::plan_route;
use delivery_routing::platform::{build_client, Platform, PlatformConfig};
use delivery_routing::shopee::ShopeeConfig;
use delivery_routing::shopify::ShopifyConfig;
use delivery_routing::stop::Stop;
use delivery_routing::tiktok::TikTokConfig;
use delivery_routing::traits::FulfillmentStatus;

/// Extract delivery addresses from an e-commerce platform and plan a route.
#[derive(Debug, Parser)]
#[command(name = "delivery-routing", version)]
struct Cli {
    /// Platform to fetch orders from (shopify, shopee, lazada, tiktok).
    platform: Platform,

    /// Fulfillment status filter.
    #[arg(long, default_value = "unfulfilled")]
    status: FulfillmentStatus,

    /// Export the planned route to a CSV file.
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Index into the geocoded stops to start the route from.
    #[arg(long)]
    start_index: Option<usize>,

    /// Shopify store URL (overrides SHOPIFY_STORE_URL).
    #[arg(long)]
    store_url: Option<String>,

    /// Access token (overrides the platform's *_ACCESS_TOKEN variable).
    #[arg(long)]
    access_token: Option<String>,

    /// App key for Lazada/TikTok (overrides LAZADA_APP_KEY / TIKTOK_APP_KEY).
    #[arg(long)]
    app_key: Option<String>,

    /// App secret for Lazada/TikTok (overrides LAZADA_APP_SECRET / TIKTOK_APP_SECRET).
    #[arg(long)]
    app_secret: Option<String>,

    /// Shop id for Shopee/TikTok (overrides SHOPEE_SHOP_ID / TIKTOK_SHOP_ID).
    #[arg(long)]
    shop_id: Option<String>,

    /// Shopee partner id (overrides SHOPEE_PARTNER_ID).
    #[arg(long)]
    partner_id: Option<String>,

    /// Shopee partner key (overrides SHOPEE_PARTNER_KEY).
    #[arg(long)]
    partner_key: Option<String>,

    /// Lazada region code (overrides LAZADA_REGION, default sg).
    #[arg(long)]
    region: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let client = build_client(platform_config(&cli))?;

    println!("Fetching orders from {}...", cli.platform);
    let addresses = client.extract_delivery_addresses(cli.status)?;

    if addresses.is_empty() {
        println!("No orders with shipping addresses found.");
        return Ok(ExitCode::SUCCESS);
    }

    println!("Found {} delivery address(es).", addresses.len());

    let ungeocoded: Vec<&Stop> = addresses.iter().filter(|a| !a.is_geocoded()).collect();
    if !ungeocoded.is_empty() {
        println!(
            "\nWarning: {} address(es) have no coordinates and will be appended at the end of the route:",
            ungeocoded.len()
        );
        for stop in &ungeocoded {
            println!("  - {}: {}", stop.order_name, stop.full_address());
        }
    }

    let route = plan_route(&addresses, cli.start_index)?;
    print_route(&route.stops, route.total_distance_km);

    if let Some(path) = &cli.csv {
        export_route_csv(&route.stops, path)?;
        println!("Route exported to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

/// Resolve credentials for the selected platform: explicit flags win,
/// environment variables fill the gaps. Adapters themselves never read the
/// environment; they get a fully resolved config.
fn platform_config(cli: &Cli) -> PlatformConfig {
    match cli.platform {
        Platform::Shopify => PlatformConfig::Shopify(ShopifyConfig::new(
            resolve(&cli.store_url, "SHOPIFY_STORE_URL"),
            resolve(&cli.access_token, "SHOPIFY_ACCESS_TOKEN"),
        )),
        Platform::Shopee => PlatformConfig::Shopee(ShopeeConfig::new(
            resolve(&cli.partner_id, "SHOPEE_PARTNER_ID")
                .parse()
                .unwrap_or(0),
            resolve(&cli.partner_key, "SHOPEE_PARTNER_KEY"),
            resolve(&cli.shop_id, "SHOPEE_SHOP_ID").parse().unwrap_or(0),
            resolve(&cli.access_token, "SHOPEE_ACCESS_TOKEN"),
        )),
        Platform::Lazada => {
            let region = resolve(&cli.region, "LAZADA_REGION");
            PlatformConfig::Lazada(LazadaConfig::new(
                resolve(&cli.app_key, "LAZADA_APP_KEY"),
                resolve(&cli.app_secret, "LAZADA_APP_SECRET"),
                resolve(&cli.access_token, "LAZADA_ACCESS_TOKEN"),
                if region.is_empty() { "sg".to_string() } else { region },
            ))
        }
        Platform::Tiktok => PlatformConfig::Tiktok(TikTokConfig::new(
            resolve(&cli.app_key, "TIKTOK_APP_KEY"),
            resolve(&cli.app_secret, "TIKTOK_APP_SECRET"),
            resolve(&cli.access_token, "TIKTOK_ACCESS_TOKEN"),
            resolve(&cli.shop_id, "TIKTOK_SHOP_ID"),
        )),
    }
}

fn resolve(flag: &Option<String>, env_key: &str) -> String {
    flag.clone()
        .or_else(|| std::env::var(env_key).ok())
        .unwrap_or_default()
}

fn print_route(stops: &[Stop], total_km: f64) {
    let rule = "=".repeat(70);
    println!("\n{rule}");
    println!("  DELIVERY ROUTE PLAN");
    println!(
        "  {} stops | {:.2} km estimated total distance",
        stops.len(),
        total_km
    );
    println!("{rule}\n");

    for (i, stop) in stops.iter().enumerate() {
        println!("  Stop {}: {}", i + 1, stop.order_name);
        println!("    Name:    {}", stop.name);
        println!("    Address: {}", stop.full_address());
        if !stop.phone.is_empty() {
            println!("    Phone:   {}", stop.phone);
        }
        if let Some((lat, lng)) = stop.location() {
            println!("    Coords:  {}, {}", lat, lng);
        }
        println!();
    }
}
