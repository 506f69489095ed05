use anyhow::Context;
use deep_research::{
    cli::{
        init::{self, InitConfig},
        output::Output,
        Cli, Commands,
    },
    research::ResearchRun,
    utils::{logging::init_tracing, toml_config::DeepResearchConfig},
    Agent, LLMClient, Provider, QuickAnswerAgent, ResearchCoordinator, ResearchServices,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Conventional exit status for SIGINT.
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    // a missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if let Err(e) = run(cli, &output).await {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init {
            path,
            force,
            provider,
        } => match init::run(
            InitConfig {
                path,
                force,
                provider,
            },
            output,
        ) {
            init::InitResult::Success | init::InitResult::AlreadyExists => Ok(()),
            init::InitResult::Error(e) => Err(anyhow::anyhow!(e)),
        },

        Commands::Config { validate } => show_config(cli.config.as_deref(), validate, output),

        Commands::Research {
            query,
            output: report_path,
            no_seed,
        } => {
            let config = load_config(cli.config.as_deref(), cli.verbose)?;
            research(config, &query, report_path, no_seed, output).await
        }

        Commands::Ask { question } => {
            let config = load_config(cli.config.as_deref(), cli.verbose)?;
            ask(&config, &question).await
        }
    }
}

fn load_config(path: Option<&Path>, verbose: bool) -> anyhow::Result<DeepResearchConfig> {
    let config =
        DeepResearchConfig::load_or_default(path).context("Failed to load configuration")?;
    init_tracing(&config.logging, verbose)?;
    Ok(config)
}

async fn research(
    config: DeepResearchConfig,
    query: &str,
    report_path: Option<PathBuf>,
    no_seed: bool,
    output: &Output,
) -> anyhow::Result<()> {
    let services = ResearchServices::from_config(&config)?;
    let mut coordinator = ResearchCoordinator::new(services, config.research.clone());
    if no_seed {
        coordinator = coordinator.with_seed_search(false);
    }

    // dropping the pipeline future aborts every in-flight angle task
    let run = tokio::select! {
        result = coordinator.run(query) => result?,
        _ = tokio::signal::ctrl_c() => {
            output.warning("Interrupted, research cancelled");
            std::process::exit(EXIT_INTERRUPTED);
        }
    };

    match &report_path {
        Some(path) => {
            std::fs::write(path, &run.document)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            output.created("report", &path.display().to_string());
        }
        None => print!("{}", run.document),
    }

    report_degradation(&run, output);
    Ok(())
}

fn report_degradation(run: &ResearchRun, output: &Output) {
    let degraded: Vec<_> = run.degraded_angles().collect();

    if !degraded.is_empty() {
        output.warning(&format!(
            "{} of {} angles gathered degraded evidence",
            degraded.len(),
            run.diagnostics.len()
        ));
        for d in degraded {
            let mut parts = Vec::new();
            if let Some(reason) = &d.search_degraded {
                parts.push(format!("search: {}", reason));
            }
            if d.fetch_failures > 0 {
                parts.push(format!("{} page(s) could not be fetched", d.fetch_failures));
            }
            if let Some(reason) = &d.task_failed {
                parts.push(reason.clone());
            }
            output.list_item(&format!("{} ({} notes): {}", d.angle, d.notes, parts.join("; ")));
        }
    }

    if !run.citation_findings.is_empty() {
        output.warning(&format!(
            "{} cited source(s) were not among the gathered pages",
            run.citation_findings.len()
        ));
        for finding in &run.citation_findings {
            output.list_item(&format!("{}: {}", finding.section, finding.source_url));
        }
    }

    output.success(&format!(
        "Report for {} ready in {:.1}s",
        run.plan.entity_name,
        run.elapsed().num_milliseconds() as f64 / 1000.0
    ));
}

async fn ask(config: &DeepResearchConfig, question: &str) -> anyhow::Result<()> {
    let provider = Provider::from_config(&config.llm)?;
    let llm: Arc<dyn LLMClient> = Arc::from(provider.create_client()?);
    let agent = QuickAnswerAgent::new(llm);

    let answer = tokio::select! {
        result = agent.execute(question) => result?,
        _ = tokio::signal::ctrl_c() => std::process::exit(EXIT_INTERRUPTED),
    };

    println!("{}", answer);
    Ok(())
}

fn show_config(path: Option<&Path>, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config =
        DeepResearchConfig::read_or_default(path).context("Failed to load configuration")?;

    if validate {
        config.validate().context("Configuration is invalid")?;
        output.success("Configuration is valid");
    }

    output.header("Effective configuration");
    output.kv("provider", config.llm.kind());
    output.kv("model", config.llm.model());
    output.kv("angle policy", &format!("{:?}", config.research.angle_policy));
    output.kv(
        "citation policy",
        &format!("{:?}", config.research.citation_policy),
    );

    print!("{}", config.to_toml()?);
    Ok(())
}
