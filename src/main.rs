use campus_select_core::app::{DependentSelector, Render, UpdateOutcome};
use campus_select_core::config::PageConfig;
use campus_select_core::error::Result;
use campus_select_core::interface::HttpClient;
use campus_select_core::state::SelectControl;
use campus_select_core::NoWasmClient;

/// Logs every control update, like the page would redraw it.
struct LogView;

impl Render for LogView {
    fn render(&self, control: &SelectControl) {
        log::info!(
            "#{} [{}] {:?}",
            control.id(),
            if control.is_visible() { "shown" } else { "hidden" },
            control.labels()
        );
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        println!("usage: {} <base_url> <college_id> [year]", args[0]);
        return Ok(());
    }

    let mut config = PageConfig::from_env()?;
    config.api.base_url = args[1].clone();
    let college_id = args[2].as_str();
    let year = args.get(3).map(String::as_str);

    let client = NoWasmClient::new(&config.api).await?;
    let ids = &config.subject_cascade;
    let selector = DependentSelector::with_structure(
        client,
        LogView,
        &ids.year_select,
        &ids.term_select,
        &ids.module_select,
    );
    selector.render_all();

    let outcome = selector.on_parent_change(college_id).await;
    print_control(&selector.years());
    if outcome != UpdateOutcome::Applied {
        return Ok(());
    }

    let Some(year) = year else {
        return Ok(());
    };
    if !selector.select_year(year) {
        println!("year {year} is not offered by college {college_id}");
        return Ok(());
    }

    match selector.on_second_level_change(college_id, year).await {
        UpdateOutcome::UnsupportedStructure(tag) => {
            println!("college {college_id} uses an unsupported structure: {tag}");
        }
        _ => {
            if let Some(terms) = selector.terms() {
                print_control(&terms);
            }
            if let Some(modules) = selector.modules() {
                print_control(&modules);
            }
        }
    }

    Ok(())
}

fn print_control(control: &SelectControl) {
    if !control.is_visible() {
        return;
    }
    println!("{}:", control.id());
    for option in control.options() {
        if option.is_placeholder() {
            println!("  {}", option.label);
        } else {
            println!("  [{}] {}", option.value, option.label);
        }
    }
}
