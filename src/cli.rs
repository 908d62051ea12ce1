use crate::app::dto::{BuildReport, LevelEntry, PackageReport};
use crate::app::engine::LoadEngine;
use crate::domain::config::LoaderConfig;
use crate::domain::policy::{Fidelity, Reason};
use anyhow::{Result, anyhow};

pub fn build_and_display(
    engine: &LoadEngine,
    patterns: &[String],
    config: &LoaderConfig,
    json: bool,
) -> Result<()> {
    let report = engine.run(patterns, config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

pub fn display_levels(
    engine: &LoadEngine,
    patterns: &[String],
    config: &LoaderConfig,
    json: bool,
) -> Result<()> {
    let levels = engine.levels(patterns, config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&levels)?);
    } else {
        print_levels(&levels);
    }
    Ok(())
}

pub fn explain_package(
    engine: &LoadEngine,
    patterns: &[String],
    config: &LoaderConfig,
    package: &str,
    json: bool,
) -> Result<()> {
    let report = engine
        .explain(patterns, config, package)?
        .ok_or_else(|| anyhow!("Package not found or not built: {}", package))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_package(&report);
    }
    Ok(())
}

fn print_report(report: &BuildReport) {
    println!("Build Summary:");
    println!("  Packages built: {}", report.package_count);
    println!("  Full:           {}", report.full_count);
    println!("  Stub:           {}", report.stub_count);
    println!("  Files:          {}", report.file_count);
    if !report.skipped.is_empty() {
        println!("  Skipped (ill-typed): {}", report.skipped.len());
        for skipped in &report.skipped {
            println!("    {}", skipped.id);
            for err in &skipped.errors {
                println!("      {}", err);
            }
        }
    }

    println!("\nInitial packages:");
    for (i, slot) in report.initial.iter().enumerate() {
        match &slot.built {
            Some(built) => println!(
                "{:>3}. {} [{}] {} members",
                i + 1,
                slot.id,
                fidelity_display(built.fidelity),
                built.member_count
            ),
            None => println!("{:>3}. {} [not built]", i + 1, slot.id),
        }
    }

    if !report.packages.is_empty() {
        println!("\n{}", "=".repeat(60));
        for p in &report.packages {
            println!(
                "  L{:<3} {:<5} {:<12} {}",
                p.level,
                fidelity_display(p.fidelity),
                reason_display(p.reason),
                p.id
            );
        }
    }
}

fn print_levels(levels: &[LevelEntry]) {
    for entry in levels {
        let marker = if entry.well_typed { "" } else { "  (ill-typed)" };
        println!("{:>4}  {}{}", entry.level, entry.id, marker);
        for err in &entry.errors {
            println!("        {}", err);
        }
    }
}

fn print_package(report: &PackageReport) {
    println!("Package: {}", report.id);
    println!("  Path:     {}", report.path);
    println!("  Name:     {}", report.name);
    println!("  Level:    {}", report.level);
    println!("  Initial:  {}", report.initial);
    println!("  Fidelity: {}", fidelity_display(report.fidelity));
    println!("  Reason:   {}", reason_display(report.reason));
    if !report.files.is_empty() {
        println!("  Files:    {}", report.files.join(", "));
    }
    if !report.members.is_empty() {
        println!("  Members:");
        for m in &report.members {
            println!("    {}", m);
        }
    }
}

fn fidelity_display(f: Fidelity) -> &'static str {
    match f {
        Fidelity::Full => "full",
        Fidelity::Stub => "stub",
    }
}

fn reason_display(r: Reason) -> &'static str {
    match r {
        Reason::Included => "include",
        Reason::Limited => "limit",
        Reason::Ignored => "ignore",
        Reason::Unmatched => "unmatched",
        Reason::DepthGated => "depth",
        Reason::Direct => "direct",
    }
}
