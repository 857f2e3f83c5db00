use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::api::{
    Alert, ApiClient, HistoryQuery, NamedEntry, NewAlert, PriceHistoryEntry, Product, ProductDetail,
    ProductQuery, Store, StoreComparison, DEFAULT_HISTORY_DAYS, DEFAULT_PAGE_SIZE,
};
use crate::config::DashboardConfig;
use crate::format;
use crate::report::DashboardReport;

/// WongPrime - terminal dashboard for supermarket price tracking
#[derive(Parser)]
#[command(name = "wongprime")]
#[command(about = "Terminal dashboard and CLI for the WongPrime price API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL (overrides config and WONGPRIME_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show dashboard statistics
    Stats,

    /// List product categories
    Categories,

    /// List brands
    Brands,

    /// List stores
    Stores,

    /// Search products
    Products(ProductsArgs),

    /// Show a product with its current prices
    Product {
        /// Product ID
        id: i64,
    },

    /// Show the price history of a product
    History {
        /// Product ID
        id: i64,

        /// Days of history
        #[arg(long, default_value_t = DEFAULT_HISTORY_DAYS)]
        days: u32,

        /// Only this store
        #[arg(long)]
        store: Option<String>,
    },

    /// Compare a product's price across stores
    Compare {
        /// Product ID
        id: i64,
    },

    /// Price alert management
    Alerts(AlertsArgs),

    /// Check API health
    Health,

    /// Write an HTML report of statistics and products
    Report(ReportArgs),

    /// Show configuration information
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ProductsArgs {
    /// Search term
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category filter
    #[arg(short, long)]
    pub category: Option<String>,

    /// Brand filter
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Maximum number of products (1-100)
    #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: u32,

    /// Number of products to skip
    #[arg(long, default_value_t = 0)]
    pub skip: u32,
}

impl ProductsArgs {
    fn to_query(&self) -> ProductQuery {
        ProductQuery::new()
            .search(self.search.as_deref())
            .category(self.category.as_deref())
            .brand(self.brand.as_deref())
            .limit(self.limit)
            .skip(self.skip)
    }
}

#[derive(Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertCommands,
}

#[derive(Subcommand)]
pub enum AlertCommands {
    /// List alerts
    List {
        /// Only alerts for this email
        #[arg(long)]
        email: Option<String>,
    },

    /// Create a price alert
    Create {
        /// Product ID
        #[arg(long)]
        product: i64,

        /// Notification email
        #[arg(long)]
        email: String,

        /// Target price in soles
        #[arg(long)]
        price: f64,
    },

    /// Delete an alert
    Delete {
        /// Alert ID
        id: i64,
    },

    /// Deactivate an alert
    Deactivate {
        /// Alert ID
        id: i64,
    },
}

#[derive(Args)]
pub struct ReportArgs {
    /// Output file (defaults to a timestamped name in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub products: ProductsArgs,

    /// Fetch the store comparison of every product to fill the best price column
    #[arg(long)]
    pub with_prices: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Command-line interface handler
pub struct CliHandler {
    client: ApiClient,
    config: DashboardConfig,
    config_path: Option<PathBuf>,
    json: bool,
}

impl CliHandler {
    pub fn new(config: DashboardConfig, config_path: Option<PathBuf>, json: bool) -> Result<Self> {
        let client = ApiClient::new(&config.api.base_url, config.api_timeout())
            .with_context(|| format!("Invalid API URL '{}'", config.api.base_url))?;
        Ok(Self {
            client,
            config,
            config_path,
            json,
        })
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Stats => self.handle_stats().await,
            Commands::Categories => {
                let entries = self.client.categories().await?;
                self.emit(&entries, |e| print_entries("🏷️  Categorías", e))
            }
            Commands::Brands => {
                let entries = self.client.brands().await?;
                self.emit(&entries, |e| print_entries("🏭 Marcas", e))
            }
            Commands::Stores => {
                let entries = self.client.stores().await?;
                self.emit(&entries, |e| print_entries("🏪 Tiendas", e))
            }
            Commands::Products(args) => {
                let products = self.client.products(&args.to_query()).await?;
                self.emit(&products, |p| print!("{}", product_table(p)))
            }
            Commands::Product { id } => {
                let detail = self.client.product(id).await?;
                self.emit(&detail, |d| print!("{}", product_detail(d)))
            }
            Commands::History { id, days, store } => {
                let query = HistoryQuery::days(days).store(store.as_deref());
                let history = self.client.price_history(id, &query).await?;
                self.emit(&history, |h| print!("{}", history_table(h)))
            }
            Commands::Compare { id } => {
                let comparison = self.client.compare(id).await?;
                self.emit(&comparison, |c| print!("{}", comparison_summary(c)))
            }
            Commands::Alerts(args) => self.handle_alerts(args).await,
            Commands::Health => {
                let health = self.client.health().await?;
                self.emit(&health, |h| {
                    println!(
                        "✅ {} ({}) en {}",
                        h.status,
                        h.service.as_deref().unwrap_or("wongprime"),
                        self.client.base_url()
                    )
                })
            }
            Commands::Report(args) => self.handle_report(args).await,
            Commands::Config(args) => self.handle_config(args),
        }
    }

    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }

    async fn handle_stats(&self) -> Result<()> {
        let stats = self.client.stats().await?;
        self.emit(&stats, |s| {
            println!("📊 WongPrime - Estadísticas");
            println!("===========================\n");
            println!("  Productos:        {}", s.total_products);
            println!("  Tiendas:          {}", s.total_stores);
            println!("  Categorías:       {}", s.total_categories);
            println!("  Alertas activas:  {}", s.active_alerts);
            match &s.last_scrape {
                Some(ts) => println!("  Último scraping:  {}", format::timestamp(ts)),
                None => println!("  Último scraping:  {}", format::MISSING),
            }
            if !s.products_per_store.is_empty() {
                println!("\n🏪 Productos por tienda:");
                for (store, count) in &s.products_per_store {
                    println!("  {store:<20} {count}");
                }
            }
            if !s.products_per_category.is_empty() {
                println!("\n🏷️  Productos por categoría:");
                for (category, count) in &s.products_per_category {
                    println!("  {category:<20} {count}");
                }
            }
        })
    }

    async fn handle_alerts(&self, args: AlertsArgs) -> Result<()> {
        match args.command {
            AlertCommands::List { email } => {
                let alerts = self.client.alerts(email.as_deref()).await?;
                self.emit(&alerts, |a| print!("{}", alert_table(a)))
            }
            AlertCommands::Create { product, email, price } => {
                let request = NewAlert::new(product, email, price);
                let alert = self.client.create_alert(&request).await?;
                self.emit(&alert, |a| {
                    println!("✅ ¡Alerta creada exitosamente! (ID {})", a.id);
                    println!(
                        "   Producto {} · {} · objetivo {}",
                        a.product_id,
                        a.email,
                        format::price(a.target_price)
                    );
                })
            }
            AlertCommands::Delete { id } => {
                let response = self.client.delete_alert(id).await?;
                self.emit(&response, |r| println!("🗑️  {}", r.message))
            }
            AlertCommands::Deactivate { id } => {
                let response = self.client.deactivate_alert(id).await?;
                self.emit(&response, |r| println!("🔕 {}", r.message))
            }
        }
    }

    async fn handle_report(&self, args: ReportArgs) -> Result<()> {
        println!("📄 Generando reporte...");
        let stats = match self.client.stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!("Error loading stats for report: {}", e);
                None
            }
        };
        let products = self.client.products(&args.products.to_query()).await?;

        let mut best_prices = HashMap::new();
        if args.with_prices {
            for product in &products {
                match self.client.compare(product.id).await {
                    Ok(comparison) => {
                        if let Some(price) = comparison.lowest_price() {
                            best_prices.insert(product.id, price);
                        }
                    }
                    Err(e) => tracing::warn!("No comparison for product {}: {}", product.id, e),
                }
            }
        }

        let report = DashboardReport::new(stats, products, best_prices);
        let path = args
            .output
            .unwrap_or_else(|| PathBuf::from(report.file_name()));
        tokio::fs::write(&path, report.render_html())
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("✅ Reporte guardado en {}", path.display());
        Ok(())
    }

    fn resolve_config_path(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Ok(DashboardConfig::default_path()?),
        }
    }

    fn handle_config(&self, args: ConfigArgs) -> Result<()> {
        match args.command {
            ConfigCommands::Show => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&self.config)?);
                } else {
                    println!("{}", toml::to_string_pretty(&self.config)?);
                }
            }
            ConfigCommands::Init { force } => {
                let path = self.resolve_config_path()?;
                if path.exists() && !force {
                    return Err(anyhow!(
                        "Configuration already exists at {} (use --force to overwrite)",
                        path.display()
                    ));
                }
                DashboardConfig::default().save(&path)?;
                println!("✅ Configuración creada en {}", path.display());
            }
            ConfigCommands::Path => {
                println!("{}", self.resolve_config_path()?.display());
            }
        }
        Ok(())
    }
}

fn print_entries(title: &str, entries: &[NamedEntry]) {
    println!("{title} ({})", entries.len());
    for entry in entries {
        match entry.id {
            Some(id) => println!("  {id:>5}  {}", entry.name),
            None => println!("         {}", entry.name),
        }
    }
}

/// Plain-text product listing
pub fn product_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "No se encontraron productos\n".to_string();
    }
    let mut out = format!("{:>6}  {:<40}  {:<18}  {}\n", "ID", "Producto", "Marca", "Categoría");
    for product in products {
        out.push_str(&format!(
            "{:>6}  {:<40}  {:<18}  {}\n",
            product.id,
            truncate(&product.name, 40),
            truncate(format::or_dash(product.brand.as_deref()), 18),
            format::or_dash(product.category.as_deref()),
        ));
    }
    out
}

pub fn product_detail(detail: &ProductDetail) -> String {
    let product = &detail.product;
    let mut out = format!("🛒 {} (ID {})\n", product.name, product.id);
    if let Some(brand) = product.brand.as_deref().filter(|b| !b.is_empty()) {
        out.push_str(&format!("   Marca: {brand}\n"));
    }
    if let Some(category) = product.category.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&format!("   Categoría: {category}\n"));
    }
    out.push_str("\n💲 Precios actuales:\n");
    if detail.current_prices.is_empty() {
        out.push_str("   Sin precios registrados\n");
    }
    let cheapest = detail.cheapest().map(|p| p.price);
    for record in &detail.current_prices {
        let mark = if cheapest == Some(record.price) { "  ✓" } else { "" };
        let stock = record
            .stock
            .map(|s| format!("  stock: {s}"))
            .unwrap_or_default();
        out.push_str(&format!(
            "   {:<12} {:>10}{stock}{mark}\n",
            record.store,
            format::price(record.price)
        ));
    }
    out
}

pub fn history_table(history: &[PriceHistoryEntry]) -> String {
    if history.is_empty() {
        return "Sin histórico disponible\n".to_string();
    }
    let mut out = String::new();
    for entry in history {
        out.push_str(&format!(
            "{}  {:<12} {:>10}  {}\n",
            format::timestamp(&entry.date),
            entry.store,
            format::price(entry.price),
            format::change_percent(entry.change_percent)
        ));
    }
    out
}

pub fn comparison_summary(comparison: &StoreComparison) -> String {
    let mut out = format!("⚖️  {} (ID {})\n", comparison.product, comparison.product_id);
    let winner = comparison.winning_store();
    for store in Store::ALL {
        let price = comparison.price_for(store);
        let mark = if price.is_some() && winner == Some(store) {
            "  ✓ Mejor Precio"
        } else {
            ""
        };
        out.push_str(&format!(
            "   {:<12} {:>10}{mark}\n",
            store.name(),
            format::optional_price(price)
        ));
    }
    if let (Some(savings), Some(store)) = (comparison.savings().filter(|s| *s > 0.0), winner) {
        out.push_str(&format!(
            "\n💰 Ahorro potencial comprando en {store}: {}\n",
            format::price(savings)
        ));
    }
    out
}

pub fn alert_table(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No hay alertas\n".to_string();
    }
    let mut out = String::new();
    for alert in alerts {
        let state = match (alert.active, alert.notified) {
            (_, true) => "📨 notificada",
            (true, false) => "🔔 activa",
            (false, false) => "🔕 inactiva",
        };
        out.push_str(&format!(
            "{:>5}  producto {:<6} {:<30} {:>10}  {state}\n",
            alert.id,
            alert.product_id,
            alert.email,
            format::price(alert.target_price)
        ));
    }
    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison() -> StoreComparison {
        StoreComparison {
            product_id: 11,
            product: "Detergente Ariel".into(),
            brand: None,
            category: None,
            price_wong: Some(25.0),
            price_metro: None,
            price_plaza_vea: Some(22.5),
            min_price: Some(22.5),
            max_price: Some(25.0),
            best_store: Some("Plaza Vea".into()),
            max_savings: Some(2.5),
        }
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "wongprime",
            "--json",
            "--api-url",
            "http://api.local:9000",
            "products",
            "--search",
            "leche",
            "--limit",
            "10",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.api_url.as_deref(), Some("http://api.local:9000"));
        match cli.command {
            Some(Commands::Products(args)) => {
                let query = args.to_query();
                assert_eq!(query.search.as_deref(), Some("leche"));
                assert_eq!(query.limit, 10);
            }
            _ => panic!("expected products command"),
        }
    }

    #[test]
    fn test_cli_without_subcommand_launches_dashboard() {
        let cli = Cli::try_parse_from(["wongprime", "--debug"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.debug);
    }

    #[test]
    fn test_alert_create_requires_fields() {
        assert!(Cli::try_parse_from(["wongprime", "alerts", "create", "--product", "3"]).is_err());
        let cli = Cli::try_parse_from([
            "wongprime", "alerts", "create", "--product", "3", "--email", "a@b.pe", "--price", "9.9",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Alerts(AlertsArgs {
                command: AlertCommands::Create { product: 3, .. }
            }))
        ));
    }

    #[test]
    fn test_comparison_summary() {
        let text = comparison_summary(&comparison());
        let plaza = text.lines().find(|l| l.contains("Plaza Vea")).unwrap();
        assert!(plaza.contains("S/ 22.50"));
        assert!(plaza.ends_with("✓ Mejor Precio"));
        let metro = text.lines().find(|l| l.contains("Metro")).unwrap();
        assert!(metro.trim_end().ends_with('-'));
        let wong = text.lines().find(|l| l.contains("Wong")).unwrap();
        assert!(!wong.contains("Mejor Precio"));
        assert!(text.contains("Ahorro potencial comprando en Plaza Vea: S/ 2.50"));
    }

    #[test]
    fn test_empty_listings() {
        assert_eq!(product_table(&[]), "No se encontraron productos\n");
        assert_eq!(alert_table(&[]), "No hay alertas\n");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Arroz", 10), "Arroz");
        assert_eq!(truncate("Arroz Costeño Extra", 6), "Arroz…");
    }
}
