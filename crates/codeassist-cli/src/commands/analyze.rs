//! Detect and analyze commands - the offline heuristics.

use std::path::Path;

use codeassist_lexer::{analyze_complexity, detect_language};

pub(crate) fn detect(file: Option<&Path>) -> miette::Result<()> {
    let code = super::read_input(file)?;
    println!("{}", detect_language(&code));
    Ok(())
}

pub(crate) fn run(file: Option<&Path>, json: bool) -> miette::Result<()> {
    let code = super::read_input(file)?;
    let report = analyze_complexity(&code);

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| miette::miette!("Failed to encode report: {}", e))?;
        println!("{}", out);
    } else {
        println!("{}", report);
    }
    Ok(())
}
