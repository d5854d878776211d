//! Plain-text rendering of a comparison report and of the provider catalog.
//!
//! Everything here returns a `String`; `main` decides where it goes.
use std::fmt::Write;

use remit_common::{ComparisonReport, ProviderCatalog, Quote};

const ESTIMATE_WARNING: &str = "ESTIMATES ONLY: exchange rates and fees are approximate, based on publicly \
listed provider rates. Always verify on the provider's website before sending. Rates change daily.";

const DISCLAIMER: &str = "Rates shown are estimates based on publicly listed provider rates and may differ \
from actual quotes. Exchange rates come from a daily reference feed and may be up to 24 hours old. \
RemitLens is not affiliated with any provider. No transfers are processed through this tool.";

const TRUE_COST_EXPLAINED: &str = "\
What is 'true cost %'?

It combines the two things providers charge you for:

  1. The explicit fee, shown clearly (e.g. \"we charge $3.99\").
  2. The exchange rate spread, hidden in the rate (e.g. mid-market is 129.50 KES/USD,
     but you are given 126.00 KES/USD; that 2.7% difference is the provider's profit).

  True cost % = fee % + spread %

A \"zero fee\" provider often has a wider spread; a \"best rate\" provider may charge a
high fee. The provider with the lowest true cost % puts the most money in your
family's hands.
";

/// Format `value` with thousands separators and `decimals` fraction digits.
pub fn format_amount(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::new();
    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Like [`format_amount`] but always carries a sign.
pub fn format_signed(value: f64, decimals: usize) -> String {
    let body = format_amount(value, decimals);
    if body.starts_with('-') {
        body
    } else {
        format!("+{}", body)
    }
}

fn card(out: &mut String, title: &str, quote: &Quote, detail: &str) {
    let _ = writeln!(
        out,
        "  {:<28} {} {:>10}   {}",
        format!("{} — {}", title, quote.provider),
        quote.receive_currency,
        format_amount(quote.receive_amount, 0),
        detail
    );
}

/// Render headline cards, the mid-market caption, the ranked table and the
/// disclaimer.
pub fn render_report(report: &ComparisonReport, explain: bool) -> String {
    let mut out = String::new();
    let from = &report.send_currency;
    let to = &report.receive_currency;

    let _ = writeln!(
        out,
        "RemitLens: send {} {} to {}\n",
        from,
        format_amount(report.send_amount, 0),
        to
    );
    let _ = writeln!(out, "{}\n", ESTIMATE_WARNING);

    let _ = writeln!(out, "Best options");
    if let Some(quote) = &report.best_rate {
        let delta = quote.receive_amount - report.mid_market_receive;
        card(
            &mut out,
            "Best amount",
            quote,
            &format!("{} vs mid-market", format_signed(delta, 0)),
        );
        if !quote.url.is_empty() {
            let _ = writeln!(out, "      Send with {} → {}", quote.provider, quote.url);
        }
    }
    if let Some(quote) = &report.fastest {
        card(&mut out, "Fastest", quote, &quote.transfer_time);
    }
    if let Some(quote) = &report.best_for_channel {
        card(
            &mut out,
            &format!("Best to {}", report.channel),
            quote,
            &format!("{:.1}% true cost", quote.true_cost_percent()),
        );
    }
    if report.ranked.is_empty() {
        let _ = writeln!(out, "  No provider matched the selection.");
    }

    let _ = writeln!(
        out,
        "\nMid-market rate: 1 {} = {:.2} {}. {} {} at mid-market = {} {}.",
        from,
        report.mid_market_rate,
        to,
        from,
        format_amount(report.send_amount, 0),
        to,
        format_amount(report.mid_market_receive, 0)
    );
    let _ = writeln!(
        out,
        "No provider charges this rate; the gap is their margin.\n"
    );

    let _ = writeln!(out, "All providers, ranked by true cost");
    let _ = writeln!(
        out,
        "{:<5} {:<15} {:>11} {:>10} {:>9} {:>16} {:>11} {:>12}  {:<10} {}",
        "Rank",
        "Provider",
        "You send",
        "Fee",
        "Rate",
        "Recipient gets",
        "True cost",
        "vs worst",
        "Speed",
        "Delivery"
    );
    for row in &report.ranked {
        let quote = &row.quote;
        let _ = writeln!(
            out,
            "{:<5} {:<15} {:>11} {:>10} {:>9.2} {:>16} {:>10.2}% {:>12}  {:<10} {}",
            format!("#{}", row.rank),
            quote.provider,
            format!("{} {}", from, format_amount(quote.send_amount, 0)),
            format!("{} {:.2}", from, quote.fee),
            quote.exchange_rate,
            format!("{} {}", to, format_amount(quote.receive_amount, 0)),
            row.true_cost_percent,
            format_signed(row.savings_vs_worst, 0),
            quote.transfer_time,
            quote.delivery_method
        );
    }

    if explain {
        let _ = writeln!(out, "\n{}", TRUE_COST_EXPLAINED);
    }

    let _ = writeln!(
        out,
        "\nRetrieved {}. {}",
        report.retrieved_at.format("%Y-%m-%d %H:%M UTC"),
        DISCLAIMER
    );
    out
}

/// Render the provider catalog: cost model, speed, delivery and notes.
pub fn render_providers(catalog: &ProviderCatalog) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<15} {:>7} {:<22} {:<10} {:<36} {}",
        "Provider", "Spread", "Fee", "Speed", "Delivery", "Notes"
    );
    for profile in catalog.profiles() {
        let _ = writeln!(
            out,
            "{:<15} {:>6.2}% {:<22} {:<10} {:<36} {}",
            profile.name,
            profile.spread_pct,
            profile.fee.describe(),
            profile.speed.to_string(),
            profile.delivery_text(),
            profile.notes
        );
    }
    out
}
