// Small dev utility: split one resource-plan ticket against a CRP snapshot file.
//
// Usage:
//   cargo run --bin split_ticket -- <db_path> <ticket_id> [capacity_json]
//
// capacity_json holds `{"transfer_pool": [...], "adjustable": [...]}`; without it
// the CRP side is empty (add tickets fall back to plain adds).

use std::sync::Arc;

use anyhow::Context;
use hcm_res_plan::app::AppState;
use hcm_res_plan::engine::StaticCapacitySource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hcm_res_plan::logging::init();

    let mut args = std::env::args().skip(1);
    let db_path = args.next().unwrap_or_else(|| "hcm_res_plan.db".to_string());
    let ticket_id = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .context("usage: split_ticket <db_path> <ticket_id> [capacity_json]")?;

    let capacity_source = match args.next() {
        Some(path) => StaticCapacitySource::from_json_file(&path)
            .with_context(|| format!("load capacity snapshot {}", path))?,
        None => StaticCapacitySource::default(),
    };

    let state = AppState::new(&db_path, Arc::new(capacity_source))
        .await
        .map_err(anyhow::Error::msg)?;

    let sub_tickets = state.ticket_api.split_ticket(&ticket_id).await?;
    for sub_ticket in &sub_tickets {
        println!(
            "sub_ticket_id={} type={} status={} stage={} admin_audit={} cpu_core={}->{}",
            sub_ticket.id,
            sub_ticket.sub_type,
            sub_ticket.status,
            sub_ticket.stage,
            sub_ticket.admin_audit_status,
            sub_ticket.original.cpu_core,
            sub_ticket.updated.cpu_core,
        );
    }
    println!("sub_ticket_count={}", sub_tickets.len());
    Ok(())
}
