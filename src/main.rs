use cardio_form::config::toml_config::LogFormat;
use cardio_form::config::{parse_field_assignment, Command};
use cardio_form::core::{ConfigProvider, RenderMode, SelectedFile, Storage};
use cardio_form::utils::{logger, validation::Validate};
use cardio_form::{
    CliConfig, Document, FormConfig, FormController, HttpPredictionClient, LocalStorage, Page,
    Preset, SubmitOutcome,
};
use clap::Parser;
use std::io::Write;
use std::path::Path;

fn print_presets() {
    for preset in Preset::ALL {
        println!("{}:", preset);
        for (name, value) in preset.values() {
            println!("  {:<15} {}", name, value);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match &cli.config {
        Some(path) => match FormConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => FormConfig::default(),
    };

    // 初始化日誌
    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("🚀 Starting cardio-form");
    cli.apply_overrides(&mut config);
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if matches!(cli.command, Command::Presets) {
        print_presets();
        return Ok(());
    }

    let document = match &config.page.markup {
        Some(path) => {
            tracing::info!("📁 Binding to host markup: {}", path);
            Document::from_html(&std::fs::read_to_string(path)?)?
        }
        None => Document::from_layout(&config.page.elements),
    };
    let page = match Page::bind(&document, &config.page.elements, config.render_mode()) {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("❌ Page binding failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let client = HttpPredictionClient::from_config(&config)?;
    let controller = FormController::from_config(client, page, &config);

    let outcome = match &cli.command {
        Command::Predict {
            preset,
            fields,
            animate,
        } => {
            if let Some(name) = preset {
                controller.apply_preset(name.parse::<Preset>()?)?;
            }
            for arg in fields {
                let Some((name, value)) = parse_field_assignment(arg) else {
                    anyhow::bail!("Invalid --field '{}', expected NAME=VALUE", arg);
                };
                controller.set_field(name, value)?;
            }

            let outcome = controller.submit_prediction().await;
            if let SubmitOutcome::Predicted(prediction) = &outcome {
                if *animate && controller.mode() == RenderMode::Gauge {
                    controller
                        .play_gauge(prediction.probability, |value| {
                            print!("\r🫀 {:>3}%", value);
                            let _ = std::io::stdout().flush();
                        })
                        .await;
                    println!();
                }
            }
            outcome
        }
        Command::Upload { file } => {
            let bytes = LocalStorage::new(".".to_string()).read_file(file).await?;
            let name = Path::new(file)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(file)
                .to_string();
            controller.select_file(Some(SelectedFile { name, bytes }));
            controller.submit_upload().await
        }
        Command::Presets => return Ok(()),
    };

    // 輸出頁面
    let storage = LocalStorage::new(config.output.path.clone());
    storage
        .write_file(
            &config.output.filename,
            controller.snapshot().to_html().as_bytes(),
        )
        .await?;
    let output_file = Path::new(&config.output.path).join(&config.output.filename);
    tracing::info!("📁 Page saved to: {}", output_file.display());

    match outcome {
        SubmitOutcome::Predicted(prediction) => {
            println!(
                "✅ {} Risk ({}%)",
                prediction.risk_level, prediction.probability
            );
            if prediction.risk_factors.is_empty() {
                println!("   No critical risk factors detected.");
            }
            for factor in &prediction.risk_factors {
                println!("   ⚠️ {}", factor);
            }
        }
        SubmitOutcome::Uploaded { shown, total } => {
            println!("✅ Scored {} rows (showing {})", total, shown);
        }
        SubmitOutcome::Notified(message) => {
            eprintln!("❌ {}", message);
            std::process::exit(2);
        }
        SubmitOutcome::Ignored | SubmitOutcome::NoFile => {
            eprintln!("Nothing submitted");
        }
    }
    println!("📁 Output saved to: {}", output_file.display());

    Ok(())
}
