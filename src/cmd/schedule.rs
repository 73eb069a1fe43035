//! Scheduling commands: `agentry order`, `affected`, `impact`, `agents`.

use anyhow::{Context, Result, anyhow};
use console::style;

use agentry::agents::{AgentId, ChangeCategory};
use agentry::config::AgentryToml;
use agentry::dag::AgentScheduler;

fn scheduler(config: &AgentryToml) -> Result<AgentScheduler> {
    config
        .scheduler()
        .context("Invalid agent graph in configuration")
}

fn parse_agents(names: &[String]) -> Result<Vec<AgentId>> {
    names
        .iter()
        .map(|name| name.parse::<AgentId>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow!("{}. Run 'agentry agents' to list known agents", e))
}

fn join(agents: &[AgentId]) -> String {
    agents
        .iter()
        .map(AgentId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn cmd_order(config: &AgentryToml, names: &[String], waves: bool) -> Result<()> {
    let scheduler = scheduler(config)?;
    let requested = parse_agents(names)?;

    if waves {
        for (i, wave) in scheduler.execution_waves(requested).iter().enumerate() {
            println!("{} {}", style(format!("Wave {}:", i + 1)).bold(), join(wave));
        }
    } else {
        for agent in scheduler.execution_order(requested) {
            println!("{}", agent);
        }
    }

    Ok(())
}

/// Unknown categories print nothing.
pub fn cmd_affected(config: &AgentryToml, category: &str) -> Result<()> {
    let scheduler = scheduler(config)?;
    for agent in scheduler.affected_agents_by_name(category) {
        println!("{}", agent);
    }
    Ok(())
}

pub fn cmd_impact(
    config: &AgentryToml,
    category: &str,
    rules: &[String],
    agents: &[String],
) -> Result<()> {
    let scheduler = scheduler(config)?;
    let category: ChangeCategory = category.parse()?;

    let agents = if agents.is_empty() {
        scheduler.affected_agents(category)
    } else {
        parse_agents(agents)?
    };

    let analysis = scheduler.analyze_change_impact(category, rules, &agents);
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

pub fn cmd_agents(config: &AgentryToml) -> Result<()> {
    let scheduler = scheduler(config)?;
    let graph = scheduler.graph();

    println!("{}", style(format!("{:<24} {}", "AGENT", "DEPENDS ON")).bold());
    for agent in AgentId::ALL {
        let deps = if !graph.contains(agent) {
            style("(not scheduled)".to_string()).dim().to_string()
        } else {
            let deps = graph.dependencies(agent);
            if deps.is_empty() {
                "-".to_string()
            } else {
                join(&deps)
            }
        };
        println!("{:<24} {}", agent.as_str(), deps);
    }

    Ok(())
}
