use anyhow::Context;
use clap::Parser;
use cliente_form::config::Command;
use cliente_form::core::page::{RESULT_BRANCH_ID, RESULT_DISTANCE_ID, RESULT_REASON_ID};
use cliente_form::core::validator::{error_message, evaluate};
use cliente_form::core::RecommendationSource;
use cliente_form::domain::model::FieldOutcome;
use cliente_form::utils::{logger, validation::Validate};
use cliente_form::{
    AssistConfig, AssistError, CliConfig, ClickResult, Document, FormAssist,
    HttpRecommendationClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("Starting cliente-form CLI");

    let config = match cli.load_assist_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::debug!("Recommendation endpoint: {}", config.recommendation_url());

    match &cli.command {
        Command::Check { page, values } => check(&config, page, values),
        Command::Recommend { address, page } => recommend(&config, address, page.as_deref()).await,
    }
}

fn load_page(path: &str) -> anyhow::Result<Document> {
    let html = std::fs::read_to_string(path).with_context(|| format!("reading page {}", path))?;
    Ok(Document::from_html(&html))
}

fn check(config: &AssistConfig, page: &str, values: &[(String, String)]) -> anyhow::Result<()> {
    let mut assist = FormAssist::init(load_page(page)?, config)?;

    for (id, value) in values {
        let field = assist
            .document()
            .element_by_id(id)
            .ok_or_else(|| AssistError::MissingElement {
                selector: format!("#{}", id),
            })?;
        assist.type_text(field, value);
    }

    let blocked = assist.submit().default_prevented;
    let doc = assist.document();
    let Some(form) = assist.bindings().form else {
        println!("⚠️  Page has no #clienteForm; nothing to validate");
        return Ok(());
    };

    for field in doc.descendants(form) {
        if !doc.has_attr(field, "required") {
            continue;
        }
        let name = doc.id(field).or(doc.attr(field, "name")).unwrap_or("?");
        match evaluate(doc, field) {
            FieldOutcome::Invalid(reason) => {
                let shown = error_message(doc, field).unwrap_or(reason);
                println!("❌ {}: {}", name, shown);
            }
            _ => println!("✅ {}", name),
        }
    }

    if blocked {
        if let Some(message) = assist.feedback().banner_message(doc) {
            eprintln!("❌ {}", message);
        }
        std::process::exit(1);
    }
    println!("✅ Form would be submitted");
    Ok(())
}

async fn recommend(config: &AssistConfig, address: &str, page: Option<&str>) -> anyhow::Result<()> {
    let client = HttpRecommendationClient::from_config(config);

    let Some(page) = page else {
        return match client.recommend(address).await {
            Ok(rec) => {
                println!("🏪 {}", rec.sucursal_recomendada);
                println!("📏 {}", rec.distancia_km);
                println!("💡 {}", rec.razon);
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Recommendation failed: {} ({:?})", e, e.category());
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Asegúrate de que la API esté corriendo en {}", config.api.base_url);
                std::process::exit(1);
            }
        };
    };

    let mut assist = FormAssist::init(load_page(page)?, config)?;
    let address_field = assist
        .bindings()
        .address
        .ok_or_else(|| AssistError::MissingElement {
            selector: "#domicilio".to_string(),
        })?;
    assist.type_text(address_field, address);

    let result = assist.click_recommend(&client).await;
    let doc = assist.document();
    match result {
        ClickResult::NotStarted => {
            if let Some(message) = assist.feedback().banner_message(doc) {
                eprintln!("❌ {}", message);
            }
            std::process::exit(1);
        }
        ClickResult::Failed => {
            if let Some(panel) = assist.widget().and_then(|w| w.panel()) {
                eprintln!("❌ {}", doc.text_content(panel).trim());
            }
            std::process::exit(1);
        }
        ClickResult::Succeeded => {
            for id in [RESULT_BRANCH_ID, RESULT_DISTANCE_ID, RESULT_REASON_ID] {
                if let Some(node) = doc.element_by_id(id) {
                    println!("{}: {}", id, doc.text_content(node));
                }
            }
            if let Some(select) = assist.bindings().branch_select {
                println!("sucursal: {}", doc.value(select));
            }
            for notification in assist.feedback().active() {
                println!("🔔 {}", notification.message);
            }
        }
    }
    Ok(())
}
