use anyhow::{Result, anyhow};
use futures::future::join_all;
use tracing::debug;

use super::ui;
use crate::core::conversion::{Conversion, convert};
use crate::core::currency::CurrencyRateProvider;
use crate::core::error::ConvertError;

/// Currency codes are accepted in any case and surrounding whitespace.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn user_message(err: &ConvertError) -> String {
    match err {
        ConvertError::RateUnavailable(_) => {
            "Error: Unable to get exchange rate. Please try again.".to_string()
        }
        other => format!("Error: {other}"),
    }
}

pub fn render_conversion(conversion: &Conversion) -> String {
    format!(
        "{}\n{}",
        ui::style_text(&conversion.summary(), ui::StyleType::Result),
        ui::style_text(&conversion.rate_info(), ui::StyleType::Subtle)
    )
}

pub fn render_table(
    amount: f64,
    from: &str,
    results: &[(String, Result<Conversion, ConvertError>)],
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate (1 {from})")),
        ui::header_cell(&format!("Amount ({amount} {from})")),
    ]);

    for (target, result) in results {
        let row = match result {
            Ok(conversion) => vec![
                comfy_table::Cell::new(target),
                ui::number_cell(format!("{:.4}", conversion.rate)),
                ui::number_cell(format!("{:.2}", conversion.converted)),
            ],
            Err(_) => vec![comfy_table::Cell::new(target), ui::na_cell(), ui::na_cell()],
        };
        table.add_row(row);
    }

    table.to_string()
}

/// Converts `amount` from one currency into each of `targets`.
pub async fn run_convert(
    provider: &(dyn CurrencyRateProvider + Send + Sync),
    amount: f64,
    from: &str,
    targets: &[String],
) -> Result<()> {
    let from = normalize_code(from);
    let targets: Vec<String> = targets.iter().map(|t| normalize_code(t)).collect();
    debug!(amount, %from, ?targets, "Converting");

    let spinner = ui::new_spinner("Fetching latest rates...");
    let conversions = join_all(targets.iter().map(|to| convert(provider, amount, &from, to))).await;
    spinner.finish_and_clear();

    let results: Vec<(String, Result<Conversion, ConvertError>)> =
        targets.into_iter().zip(conversions).collect();

    match results.as_slice() {
        [] => Err(anyhow!("No target currency given")),
        [(_, single)] => match single {
            Ok(conversion) => {
                println!("{}", render_conversion(conversion));
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", ui::style_text(&user_message(e), ui::StyleType::Error));
                Err(e.clone().into())
            }
        },
        many => {
            println!("{}", render_table(amount, &from, many));
            if many.iter().all(|(_, r)| r.is_err()) {
                return Err(anyhow!("Unable to convert {} {} into any target", amount, from));
            }
            Ok(())
        }
    }
}

/// Shows the current rate for a single pair.
pub async fn run_rate(
    provider: &(dyn CurrencyRateProvider + Send + Sync),
    from: &str,
    to: &str,
) -> Result<()> {
    let (from, to) = (normalize_code(from), normalize_code(to));

    let spinner = ui::new_spinner("Fetching latest rates...");
    let result = convert(provider, 1.0, &from, &to).await;
    spinner.finish_and_clear();

    match result {
        Ok(conversion) => {
            println!("{}", conversion.rate_info());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", ui::style_text(&user_message(&e), ui::StyleType::Error));
            Err(e.into())
        }
    }
}
