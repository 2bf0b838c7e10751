// Skedule
// Headless entry point: fetch the current week and print the rendered grid.

use anyhow::Result;
use chrono::Local;

use skedule::config::AppConfig;
use skedule::services::remote::HttpScheduleApi;
use skedule::services::schedule::ScheduleService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Skedule");

    let config = AppConfig::load()?;
    let token = std::env::var("SKEDULE_TOKEN")
        .ok()
        .or_else(|| config.api.token.clone());

    let api = HttpScheduleApi::new(&config.api.base_url, token)?;
    let mut service = ScheduleService::new(
        api,
        Local::now().date_naive(),
        config.grid,
        config.cache_ttl(),
    );

    let frame = service.start().await?;

    if !frame.connected {
        println!("Calendar not connected. Connect it in the web app and retry.");
        return Ok(());
    }

    println!(
        "Week of {} ({} day columns)",
        frame.range.start.date(),
        frame.days.len()
    );
    for day in &frame.days {
        println!("{}", day.date.format("%a %Y-%m-%d"));
        for chip in &day.chips {
            println!("  [all-day lane {}] {}", chip.lane, chip.title);
        }
        for block in &day.blocks {
            let tag = block
                .suggestion_id
                .as_deref()
                .map(|id| format!(" (suggestion {id})"))
                .unwrap_or_default();
            println!(
                "  {:?} y={:.0}px h={:.0}px {}{}",
                block.layer, block.top, block.height, block.label, tag
            );
        }
    }

    match service.load_tasks().await {
        Ok(tasks) => {
            println!("{} task(s)", tasks.len());
            for task in tasks {
                println!("  {} ({:?}, {:?})", task.name, task.focus_level, task.time_preference);
            }
        }
        Err(err) => log::warn!("task list unavailable: {err}"),
    }

    Ok(())
}
