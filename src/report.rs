//! Plain-text solutions and LaTeX task sheets.
//!
//! A sheet holds one section per variant: the task statement, the probability
//! table, and optionally the solution. Text is built with `push_str`/`format!`
//! only; nothing here touches the filesystem (see [`crate::storage`]).

use crate::types::ProbabilityMatrix;
use crate::summary::ResultSummary;

/// One task on a sheet: its matrix and solved summary.
pub struct Variant<'a> {
    pub matrix: &'a ProbabilityMatrix,
    pub summary: &'a ResultSummary,
}

/// Matrix, optimal allocations one per line, then the max probability.
pub fn solution_text(matrix: &ProbabilityMatrix, summary: &ResultSummary) -> String {
    let mut text = String::new();
    text.push_str("Probability matrix:\n");
    text.push_str(&matrix.to_string());
    text.push_str("\n\nOptimal machine allocations per company (first to last):\n");
    for allocation in &summary.allocations {
        text.push_str(&allocation.to_string());
        text.push('\n');
    }
    if summary.truncated {
        text.push_str(&format!(
            "... {} of {} optimal allocations shown\n",
            summary.allocations.len(),
            summary.total_allocations
        ));
    }
    text.push_str(&format!(
        "\nMaximum probability of completing the order: {}\n",
        summary.formatted_probability()
    ));
    text
}

/// `tabular` with a header of machine counts and one `$P_{i}$` row per company.
pub fn latex_table(matrix: &ProbabilityMatrix) -> String {
    let m = matrix.machines();
    let mut latex = String::from("\\begin{center}\n");
    latex.push_str(&format!("\\begin{{tabular}}{{|{}}}\n", "c|".repeat(m + 1)));
    latex.push_str("\\hline\n");

    let headers: Vec<String> = (1..=m).map(|k| k.to_string()).collect();
    latex.push_str(&format!(" & {} \\\\ \\hline\n", headers.join(" & ")));

    for (actor, row) in matrix.rows().enumerate() {
        let cells: Vec<String> = row.iter().map(|p| format!("{:?}", p)).collect();
        latex.push_str(&format!(
            "$P_{{{}}}$ & {} \\\\ \\hline\n",
            actor + 1,
            cells.join(" & ")
        ));
    }

    latex.push_str("\\end{tabular}\n");
    latex.push_str("\\end{center}\n");
    latex
}

/// Full `article` document, one section per variant.
pub fn latex_document(variants: &[Variant<'_>], with_solutions: bool) -> String {
    let mut latex = String::from("\\documentclass{article}\n");
    latex.push_str("\\usepackage[utf8]{inputenc}\n");
    latex.push_str("\\usepackage{geometry}\n");
    latex.push_str("\\usepackage{amsmath}\n");
    latex.push_str("\\usepackage{graphicx}\n");
    latex.push_str("\\geometry{a4paper, margin=1in}\n");
    latex.push_str("\\begin{document}\n");

    for (i, variant) in variants.iter().enumerate() {
        let n = variant.matrix.companies();
        let m = variant.matrix.machines();
        latex.push_str(&format!("\\section*{{Variant No. {}}}\n", i + 1));
        latex.push_str(&format!(
            "An urgent order for {} machines has to be placed among {} companies. ",
            m, n
        ));
        latex.push_str(
            "The probability that the $k$-th company completes its part of the order is $P_k$ \
             (where $k$ is the index); it depends on the size of the order and is given by the table.\n",
        );
        latex.push_str(&latex_table(variant.matrix));
        latex.push_str(
            "\nFind the optimal placement of the order that maximizes the probability $P$ \
             of the order being completed by all companies.\n",
        );
        if with_solutions {
            latex.push_str("\n\\textbf{Solution:}\n");
            latex.push_str(&solution_text(variant.matrix, variant.summary).replace('\n', "\\newline\n"));
        }
        if i + 1 < variants.len() {
            latex.push_str("\\newpage\n");
        }
    }

    latex.push_str("\\end{document}\n");
    latex
}
