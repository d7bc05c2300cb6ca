use crate::infra::{build_provider, load_config, parse_action};
use chrono::Local;
use clap::Args;
use funnel_insights::analytics::{
    format_currency, format_number, format_percentage, portfolio_summary, program_insights,
    project, PortfolioSummary, Program, ProgramId, ProgramInsight, RecommendationAction,
    ScenarioProjection, SpendScenario,
};
use funnel_insights::catalog::{ProgramFilters, ProgramProvider};
use funnel_insights::error::AppError;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Program CSV export to load instead of the configured source
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Only list programs from this school
    #[arg(long)]
    pub(crate) school: Option<String>,
    /// Only list programs at this level (Certificate or Degree)
    #[arg(long)]
    pub(crate) level: Option<String>,
    /// Minimum lead volume
    #[arg(long)]
    pub(crate) min_leads: Option<u64>,
    /// Maximum cost per lead
    #[arg(long)]
    pub(crate) max_cost_per_lead: Option<f64>,
    /// Only list programs with this recommended action
    #[arg(long, value_parser = parse_action)]
    pub(crate) action: Option<RecommendationAction>,
    /// Emit JSON instead of a text table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Program identifier, e.g. smu-lean-six-sigma-yellow
    pub(crate) id: String,
    /// Program CSV export to load instead of the configured source
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Project spend at this multiple of current spend (0.5 - 2.0)
    #[arg(long)]
    pub(crate) spend_multiplier: Option<f64>,
    /// Project a relative conversion change in percent (-20 - 50)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) conversion_boost: Option<f64>,
    /// Emit JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PortfolioArgs {
    /// Program CSV export to load instead of the configured source
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Emit JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct ProgramDetail<'a> {
    program: &'a Program,
    insights: Vec<ProgramInsight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<ScenarioProjection>,
}

pub(crate) fn run_program_list(args: ListArgs) -> Result<(), AppError> {
    let ListArgs {
        csv,
        school,
        level,
        min_leads,
        max_cost_per_lead,
        action,
        json,
    } = args;

    let config = load_config(csv)?;
    let provider = build_provider(&config)?;
    let filters = ProgramFilters {
        school,
        level,
        min_leads,
        max_cost_per_lead,
        recommendation_action: action,
    };
    let programs = provider.programs(&filters)?;

    if json {
        return print_json(&programs);
    }

    println!(
        "Program funnel report ({} programs, generated {})",
        programs.len(),
        Local::now().date_naive()
    );
    for program in &programs {
        render_program_row(program);
    }
    Ok(())
}

pub(crate) fn run_program_show(args: ShowArgs) -> Result<(), AppError> {
    let ShowArgs {
        id,
        csv,
        spend_multiplier,
        conversion_boost,
        json,
    } = args;

    let config = load_config(csv)?;
    let provider = build_provider(&config)?;
    let program = provider
        .program_by_id(&ProgramId(id.clone()))?
        .ok_or(AppError::NotFound(id))?;

    let scenario = scenario_from_args(spend_multiplier, conversion_boost)
        .map(|scenario| project(&program, &scenario))
        .transpose()?;
    let detail = ProgramDetail {
        insights: program_insights(&program),
        program: &program,
        scenario,
    };

    if json {
        return print_json(&detail);
    }

    render_program_detail(&detail);
    Ok(())
}

pub(crate) fn run_portfolio(args: PortfolioArgs) -> Result<(), AppError> {
    let config = load_config(args.csv)?;
    let provider = build_provider(&config)?;
    let programs = provider.programs(&ProgramFilters::default())?;
    let summary = portfolio_summary(&programs);

    if args.json {
        return print_json(&summary);
    }

    render_portfolio(&summary);
    Ok(())
}

fn scenario_from_args(
    spend_multiplier: Option<f64>,
    conversion_boost: Option<f64>,
) -> Option<SpendScenario> {
    if spend_multiplier.is_none() && conversion_boost.is_none() {
        return None;
    }
    let defaults = SpendScenario::default();
    Some(SpendScenario {
        spend_multiplier: spend_multiplier.unwrap_or(defaults.spend_multiplier),
        conversion_boost_pct: conversion_boost.unwrap_or(defaults.conversion_boost_pct),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

fn render_program_row(program: &Program) {
    let action = program
        .recommendation
        .as_ref()
        .map_or("Not evaluated", |rec| rec.action.label());
    let completeness = program
        .data_completeness
        .as_ref()
        .map_or_else(|| "unscored".to_string(), |score| format!("{}/100", score.overall));

    println!(
        "- {} | {} | {} ({})",
        program.id,
        program.school,
        program.program_name,
        program.level.label()
    );
    println!(
        "  {} leads | {} lead-to-enrollment | {} CPE | data {} | {}",
        format_number(Some(program.leads as f64)),
        format_percentage(program.conversions.lead_to_enrollment_rate, 1),
        format_currency(program.roi.and_then(|roi| roi.cost_per_enrollment)),
        completeness,
        action
    );
}

fn render_program_detail(detail: &ProgramDetail<'_>) {
    let program = detail.program;
    println!("{} - {}", program.school, program.program_name);
    println!("Level: {}", program.level.label());

    let funnel = &program.funnel;
    println!("Funnel:");
    for (stage, count) in [
        ("Visitors", funnel.visitors),
        ("Inquiries", funnel.inquiries),
        ("Opportunities", funnel.opportunities),
        ("Applications", funnel.applications),
        ("Enrollments", funnel.enrollments),
    ] {
        println!("  - {stage}: {}", format_number(count.map(|value| value as f64)));
    }

    let conversions = &program.conversions;
    println!("Conversion:");
    println!(
        "  - Inquiry to opportunity: {}",
        format_percentage(conversions.inquiry_to_opportunity_rate, 1)
    );
    println!(
        "  - Opportunity to application: {}",
        format_percentage(conversions.opportunity_to_application_rate, 1)
    );
    println!(
        "  - Application to enrollment: {}",
        format_percentage(conversions.application_to_enrollment_rate, 1)
    );
    println!(
        "  - Lead to enrollment: {}",
        format_percentage(conversions.lead_to_enrollment_rate, 1)
    );

    let roi = program.roi.unwrap_or_default();
    println!(
        "Spend: {} | CPL {} | CPE {}",
        format_currency(program.spend.as_ref().map(|spend| spend.total_spend)),
        format_currency(roi.cost_per_lead),
        format_currency(roi.cost_per_enrollment)
    );

    if let Some(score) = &program.data_completeness {
        println!("Data completeness: {}/100 ({})", score.overall, score.status.label());
    }

    if let Some(rec) = &program.recommendation {
        let change = rec
            .suggested_spend_change
            .map(|change| format!(" ({change:+}%)"))
            .unwrap_or_default();
        println!(
            "Recommendation: {}{} [{} confidence]",
            rec.action.label(),
            change,
            rec.confidence.label()
        );
        println!("  {}", rec.reasoning);
    }

    if detail.insights.is_empty() {
        println!("Insights: none");
    } else {
        println!("Insights:");
        for insight in &detail.insights {
            println!(
                "  - [{}] {}: {}",
                insight.kind.label(),
                insight.title,
                insight.description
            );
        }
    }

    if let Some(projection) = &detail.scenario {
        println!(
            "Scenario ({:.2}x spend, {:+.0}% conversion):",
            projection.scenario.spend_multiplier, projection.scenario.conversion_boost_pct
        );
        println!(
            "  - Spend: {} -> {}",
            format_currency(Some(projection.current_spend)),
            format_currency(Some(projection.scenario_spend))
        );
        println!(
            "  - Enrollments: {} -> {}",
            format_number(projection.current_enrollments.map(|value| value as f64)),
            format_number(Some(projection.scenario_enrollments as f64))
        );
        println!(
            "  - Cost per enrollment: {} -> {}",
            format_currency(projection.current_cost_per_enrollment),
            format_currency(projection.scenario_cost_per_enrollment)
        );
    }
}

fn render_portfolio(summary: &PortfolioSummary) {
    println!("Portfolio summary ({} programs)", summary.total_programs);
    println!(
        "- {} strong buys | {} buys | {} holds | {} reduce or pause",
        summary.strong_buys, summary.buys, summary.holds, summary.reduces
    );

    if summary.top_recommendations.is_empty() {
        println!("No programs currently warrant more spend.");
        return;
    }

    println!("Top recommendations:");
    for pick in &summary.top_recommendations {
        let change = pick
            .suggested_spend_change
            .map(|change| format!("{change:+}%"))
            .unwrap_or_default();
        println!(
            "  - {} / {} {} [{}]: {}",
            pick.school,
            pick.program_name,
            change,
            pick.confidence.label(),
            pick.reasoning
        );
    }
}
