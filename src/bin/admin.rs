use coursework::{Config, bootstrap_admin};
use tracing_subscriber::EnvFilter;

fn print_usage(bin_name: &str) {
    eprintln!("Usage: {bin_name} bootstrap-admin");
    eprintln!("Reads ADMIN_FULL_NAME and ADMIN_PASSWORD from the environment.");
}

fn init_tracing(log_level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn required_env(name: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            eprintln!("{name} must be set");
            std::process::exit(2);
        }
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let mut args = std::env::args();
    let bin_name = args.next().unwrap_or_else(|| "coursework-admin".to_string());
    let command = args.next();

    if command.as_deref() != Some("bootstrap-admin") || args.next().is_some() {
        print_usage(&bin_name);
        std::process::exit(2);
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level, config.logging.json_format);

    let full_name = required_env("ADMIN_FULL_NAME");
    let password = required_env("ADMIN_PASSWORD");

    match bootstrap_admin(&config, &full_name, &password).await {
        Ok(result) => {
            println!("Admin identity ready: email={}, id={}", result.email, result.user_id);
        }
        Err(err) => {
            eprintln!("Admin bootstrap failed: {err}");
            std::process::exit(1);
        }
    }
}
