use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use swot_verify::core::batch::{check_many, TargetOutcome};
use swot_verify::utils::error::ErrorSeverity;
use swot_verify::utils::logger;
use swot_verify::utils::validation::{validate_required_field, Validate};
use swot_verify::{
    ClerkClient, CliConfig, DomainVerifier, ReqwestTransport, Settings, StudentVerification,
    VerifyError,
};

const EXIT_NOT_VERIFIED: i32 = 1;
const EXIT_CONFIG_ERROR: i32 = 2;
const EXIT_TRANSPORT_ERROR: i32 = 3;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = match cli.settings().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            logger::init_cli_logger(cli.verbose, None);
            fail_config(&e);
        }
    };

    if settings.json_logs {
        logger::init_json_logger(settings.log_level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, settings.log_level.as_deref());
    }

    tracing::info!("Starting swot-verify");
    tracing::debug!("Resolved settings: {:?}", settings);

    let verifier = match DomainVerifier::from_config(&settings) {
        Ok(verifier) => verifier,
        Err(e) => fail_config(&e),
    };

    let exit_code = match &cli.session_cookie {
        Some(cookie) => verify_students(&cli, &settings, verifier, cookie).await,
        None => check_domains(&cli, &settings, verifier).await,
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn fail_config(e: &VerifyError) -> ! {
    tracing::error!("❌ Configuration validation failed: {}", e);
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(EXIT_CONFIG_ERROR);
}

fn exit_code_for(e: &VerifyError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => EXIT_NOT_VERIFIED,
        ErrorSeverity::Medium => EXIT_TRANSPORT_ERROR,
        ErrorSeverity::High => EXIT_CONFIG_ERROR,
        ErrorSeverity::Critical => EXIT_TRANSPORT_ERROR,
    }
}

fn report_error(input: &str, e: &VerifyError, json: bool) {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        input,
        e,
        e.category(),
        e.severity()
    );
    if json {
        println!(
            "{}",
            serde_json::json!({ "input": input, "error": e.to_string() })
        );
    } else {
        eprintln!("❌ {}: {}", input, e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
    }
}

async fn check_domains(
    cli: &CliConfig,
    settings: &Settings,
    verifier: DomainVerifier<ReqwestTransport>,
) -> i32 {
    let outcomes = check_many(
        Arc::new(verifier),
        cli.targets.clone(),
        settings.concurrent_requests,
    )
    .await;

    let mut exit_code = 0;
    for TargetOutcome { input, result } in outcomes {
        match result {
            Ok(lookup) => {
                if cli.json {
                    println!(
                        "{}",
                        serde_json::json!({
                            "input": input,
                            "domain": lookup.domain,
                            "status": lookup.status,
                            "verified": lookup.is_verified(),
                        })
                    );
                } else if lookup.is_verified() {
                    println!("✅ {}: school domain", input);
                } else {
                    println!("➖ {}: not recognised (HTTP {})", input, lookup.status);
                }
                if !lookup.is_verified() {
                    exit_code = exit_code.max(EXIT_NOT_VERIFIED);
                }
            }
            Err(e) => {
                report_error(&input, &e, cli.json);
                exit_code = exit_code.max(exit_code_for(&e));
            }
        }
    }
    exit_code
}

async fn verify_students(
    cli: &CliConfig,
    settings: &Settings,
    verifier: DomainVerifier<ReqwestTransport>,
    cookie: &str,
) -> i32 {
    let secret_key = match validate_required_field("clerk.secret_key", &settings.clerk_secret_key)
    {
        Ok(key) => key,
        Err(e) => fail_config(&e),
    };

    let timeout = Duration::from_secs(settings.timeout_seconds);
    let clerk = match ClerkClient::new(secret_key.as_str(), timeout) {
        Ok(clerk) => clerk.with_base_url(settings.clerk_base_url.as_str()),
        Err(e) => fail_config(&e),
    };
    let service = StudentVerification::new(clerk, verifier);

    let mut exit_code = 0;
    for email in &cli.targets {
        match service.verify(cookie, email).await {
            Ok(status) => {
                if cli.json {
                    let mut value = serde_json::to_value(&status).unwrap_or_default();
                    value["input"] = serde_json::Value::String(email.clone());
                    println!("{}", value);
                } else if status.is_verified() {
                    println!("✅ {}: verified student", email);
                } else {
                    println!("➖ {}: {:?}", email, status);
                }
                if !status.is_verified() {
                    exit_code = exit_code.max(EXIT_NOT_VERIFIED);
                }
            }
            Err(e) => {
                report_error(email, &e, cli.json);
                exit_code = exit_code.max(exit_code_for(&e));
            }
        }
    }
    exit_code
}
