//! Menu-driven terminal session. This loop is the single owner of the
//! controller; provider calls are awaited in place, so state is only ever
//! mutated here.

use ai_client::GenerativeModel;
use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use dataxray::render::results_terminal;
use dataxray::{Config, Controller, Platform};

use crate::spinner;

enum Action {
    Search,
    Optimize,
    ChoosePlatform,
    Quit,
}

pub async fn run(config: &Config, platform: Platform) -> Result<()> {
    let mut controller = Controller::new(config.gemini());
    controller.select_platform(platform);

    println!(
        "{}  {}",
        style("DataXray").bold().blue(),
        style("Dataset Discovery").dim()
    );
    println!(
        "{}\n",
        style("Find datasets across Kaggle, GitHub, government portals and academic repositories.")
            .dim()
    );

    loop {
        match choose_action(controller.state().selected_platform).await? {
            Action::Search => search(&mut controller).await?,
            Action::Optimize => optimize(&mut controller).await?,
            Action::ChoosePlatform => {
                let platform = choose_platform(controller.state().selected_platform).await?;
                controller.select_platform(platform);
            }
            Action::Quit => return Ok(()),
        }
    }
}

async fn search<M: GenerativeModel>(controller: &mut Controller<M>) -> Result<()> {
    let text = read_query(
        "Search for datasets (e.g. 'Global CO2 Emissions CSV')",
        controller.state().query.clone(),
    )
    .await?;

    let Some(ticket) = controller.begin_search(&text) else {
        return Ok(());
    };

    let bar = spinner(format!("Scanning repositories for '{}'...", ticket.query()));
    let result = controller.run_search(&ticket).await;
    bar.finish_and_clear();
    controller.complete_search(ticket, result);

    println!("\n{}\n", results_terminal(controller.state()));
    Ok(())
}

async fn optimize<M: GenerativeModel>(controller: &mut Controller<M>) -> Result<()> {
    let text = read_query("Query to optimize", controller.state().query.clone()).await?;

    let Some(ticket) = controller.begin_optimize(&text) else {
        return Ok(());
    };

    let bar = spinner("Optimizing query...".to_string());
    let optimized = controller.run_optimize(&ticket).await;
    bar.finish_and_clear();
    controller.complete_optimize(ticket, optimized);

    println!(
        "{} {}\n",
        style("Optimized query:").green(),
        controller.state().query
    );
    Ok(())
}

/// dialoguer blocks on the terminal, so prompts run off the async worker.
async fn blocking<T, F>(prompt: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(prompt).await??)
}

async fn choose_action(platform: Platform) -> Result<Action> {
    let choice = blocking(move || {
        let items = vec![
            "Search".to_string(),
            "Optimize query".to_string(),
            format!("Platform: {}", platform.name()),
            "Quit".to_string(),
        ];
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What next?")
            .items(&items)
            .default(0)
            .interact_opt()
    })
    .await?;

    Ok(match choice {
        Some(0) => Action::Search,
        Some(1) => Action::Optimize,
        Some(2) => Action::ChoosePlatform,
        _ => Action::Quit,
    })
}

async fn choose_platform(current: Platform) -> Result<Platform> {
    let selected = blocking(move || {
        let names: Vec<&str> = Platform::ALL.iter().map(|p| p.name()).collect();
        let default = Platform::ALL
            .iter()
            .position(|p| *p == current)
            .unwrap_or(0);
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Focus search on")
            .items(&names)
            .default(default)
            .interact_opt()
    })
    .await?;

    Ok(selected.map_or(current, |i| Platform::ALL[i]))
}

async fn read_query(prompt: &'static str, initial: String) -> Result<String> {
    blocking(move || {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
    })
    .await
}
