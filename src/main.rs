mod app;
mod cart;
mod checkout;
mod config;
mod domain;
mod gateway;
mod session;

use app::App;
use domain::PaymentInfo;
use gateway::{OrderGateway, OrderScope, PageQuery, ProductGateway};
use std::env;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

fn parse_config_path() -> String {
    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    DEFAULT_CONFIG_PATH.to_string()
}

fn init_tracing(log_level: Option<&str>) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config_path = parse_config_path();

    let app = match App::from_config_path(&config_path) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to initialize: {}", e);
            return;
        }
    };

    init_tracing(app.config().app.log_level.as_deref());

    info!(
        config = %config_path,
        api = %app.config().api.base_url,
        "Client initialized"
    );

    let watcher = app.start_session_watcher();

    let user = match app.bootstrap().await {
        Ok(Some(user)) => user,
        Ok(None) => {
            // Fall back to credential login if the environment provides one.
            let (Ok(email), Ok(password)) = (env::var("LOGIN_EMAIL"), env::var("LOGIN_PASSWORD"))
            else {
                info!("No stored session; set ACCESS_TOKEN or LOGIN_EMAIL/LOGIN_PASSWORD");
                return;
            };

            match app.login(&email, &password).await {
                Ok(user) => user,
                Err(e) => {
                    error!(error = %e, "Login failed");
                    return;
                }
            }
        }
        Err(e) => {
            error!(error = %e, "Bootstrap failed");
            return;
        }
    };

    info!(user = %user.name, vendor = user.is_vendor(), "Session restored");

    if env::args().any(|arg| arg == "--demo-cart") {
        demo_cart(&app).await;
    } else {
        show_catalog(&app).await;
        show_orders(&app).await;
    }

    app.logout();
    watcher.abort();
}

/// Lists the first page of the product catalog.
async fn show_catalog(app: &App) {
    let page = match app.api().list_products(&PageQuery::default()).await {
        Ok(page) => page,
        Err(e) => {
            error!(error = %e, "Failed to list products");
            return;
        }
    };

    info!(total = page.total, "Fetched product catalog");

    for product in &page.items {
        info!(
            id = product.id,
            name = %product.name,
            unit = %product.unit,
            stock = product.stock_quantity,
            price = %product.product_price,
            "Product"
        );
    }
}

/// Lists the first page of orders with the affordances the UI would offer,
/// then exports them as CSV.
async fn show_orders(app: &App) {
    let is_vendor = app.session().user().map(|u| u.is_vendor()).unwrap_or(false);
    let scope = if is_vendor {
        OrderScope::Vendor
    } else {
        OrderScope::User
    };

    let page = match app
        .api()
        .list_orders(scope, &PageQuery::default(), None)
        .await
    {
        Ok(page) => page,
        Err(e) => {
            error!(error = %e, "Failed to list orders");
            return;
        }
    };

    info!(
        total = page.total,
        page_index = page.page_index,
        items_per_page = page.items_per_page,
        "Fetched orders"
    );

    for order in &page.items {
        info!(
            id = order.id,
            status = %order.status,
            total = %order.total_price,
            cancellable = order.is_cancellable(),
            advanceable = order.is_advanceable(),
            "Order"
        );
    }

    match app.api().export_csv(scope, None).await {
        Ok(csv) => info!(bytes = csv.len(), "Exported orders CSV"),
        Err(e) => error!(error = %e, "CSV export failed"),
    }
}

/// Walk the cart flow end to end against a live backend: add an item,
/// adjust it, select everything, and submit one order per vendor.
async fn demo_cart(app: &App) {
    let product_id: u64 = match env::var("DEMO_PRODUCT_ID").ok().and_then(|v| v.parse().ok()) {
        Some(id) => id,
        None => {
            error!("DEMO_PRODUCT_ID is required for --demo-cart");
            return;
        }
    };

    let cart = app.cart();

    if let Err(e) = cart.add_item(product_id, 1).await {
        error!(error = %e, "Failed to add item");
        return;
    }

    if let Err(e) = cart.set_quantity(product_id, 2).await {
        error!(error = %e, "Failed to set quantity");
        return;
    }

    for item in cart.items() {
        cart.toggle_checkout(item.product_id);
        info!(
            product = %item.product_name,
            quantity = item.quantity,
            selected = cart.is_selected(item.product_id),
            "Cart line"
        );
    }

    let methods = match app.api().payment_methods().await {
        Ok(methods) => methods,
        Err(e) => {
            error!(error = %e, "Failed to fetch payment methods");
            return;
        }
    };
    let Some(method) = methods.first() else {
        error!("No payment methods available");
        return;
    };

    let payment = PaymentInfo {
        payment_method_id: method.id.clone(),
        recipient_name: "Demo Recipient".to_string(),
        recipient_phone: "555-0100".to_string(),
        recipient_address: "1 Demo Street".to_string(),
    };

    let request = match checkout::build_orders_create(&cart.checkout_items(), &payment) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Nothing to check out");
            return;
        }
    };

    info!(sub_orders = request.orders.len(), "Submitting orders");

    match app.api().create_orders(&request).await {
        Ok(()) => info!("Orders placed"),
        Err(e) => error!(error = %e, "Order submission failed"),
    }

    // Drop the demo line if the server kept it in the cart.
    if let Err(e) = cart.refresh().await {
        warn!(error = %e, "Cart refresh failed");
    }
    if cart.items().iter().any(|i| i.product_id == product_id) {
        if let Err(e) = cart.remove_item(product_id).await {
            warn!(error = %e, "Cleanup removal failed");
        }
    }
}
