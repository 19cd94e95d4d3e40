//! Rapport HTML du PEC-PCD

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{Context, Result};

use crate::report::{EvaluationReport, EvaluationStatus};

/// Écrit le rapport HTML dans un fichier
pub fn export_report(report: &EvaluationReport, output_path: &Path) -> Result<()> {
    std::fs::write(output_path, render(report)?)
        .context(format!("Failed to write HTML report: {}", output_path.display()))
}

/// Produit le document HTML du rapport
pub fn render(report: &EvaluationReport) -> Result<String> {
    let mut html = String::with_capacity(4096);
    write_document(&mut html, report).context("Failed to render HTML report")?;
    Ok(html)
}

fn write_document(html: &mut String, report: &EvaluationReport) -> fmt::Result {

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>MRE - PEC-PCD</title>\n<style>\n\
         body { font-family: sans-serif; background: #f4f6ea; margin: 2em; }\n\
         h1 { text-align: center; text-decoration: underline; font-size: 1.2em; }\n\
         table { border-collapse: collapse; width: 100%; }\n\
         td, th { border: 1px solid #555; padding: 4px; text-align: center; }\n\
         .error { color: #a00; font-weight: bold; }\n\
         </style>\n</head>\n<body>\n\
         <h1>M&Eacute;TODO DOS RET&Acirc;NGULOS EQUIVALENTES</h1>\n",
    );

    for (index, (title, layer)) in [
        ("Camada de Refer&ecirc;ncia", &report.reference),
        ("Camada de Teste", &report.discrepancies),
    ]
    .into_iter()
    .enumerate()
    {
        write!(
            html,
            "<h2>{}. {}</h2>\n<ul>\n<li>nome: {}</li>\n<li>total de fei&ccedil;&otilde;es: {}</li>\n",
            index + 1,
            title,
            escape_html(&layer.name),
            layer.feature_count
        )?;
        if let Some(epsg) = layer.epsg {
            writeln!(html, "<li>SRC: EPSG:{}</li>", epsg)?;
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<h2>3. Relat&oacute;rio</h2>\n<ul>\n");
    writeln!(
        html,
        "<li>comprimento total relacionado (m): {:.4}</li>",
        report.total_length()
    )?;

    match (report.status, report.stats) {
        (EvaluationStatus::Success, Some(stats)) => {
            for (label, value) in [
                ("m&eacute;dia ponderada das discrep&acirc;ncias (m)", stats.weighted_mean),
                ("REMQ ponderado (m)", stats.weighted_rms),
                ("m&eacute;dia das discrep&acirc;ncias (m)", stats.mean),
                ("desvio-padr&atilde;o (m)", stats.std_dev),
                ("discrep&acirc;ncia m&aacute;xima (m)", stats.max),
                ("discrep&acirc;ncia m&iacute;nima (m)", stats.min),
            ] {
                writeln!(html, "<li>{}: {:.4}</li>", label, value)?;
            }
            if !report.skipped.is_empty() {
                writeln!(
                    html,
                    "<li>pol&iacute;gonos ignorados: {}</li>",
                    report.skipped.len()
                )?;
            }
            html.push_str("</ul>\n");
            render_grades(html, report)?;
        }
        _ => {
            html.push_str("</ul>\n");
            writeln!(
                html,
                "<p class=\"error\">{}</p>",
                escape_html(report.message.as_deref().unwrap_or("Evaluation failed"))
            )?;
        }
    }

    html.push_str("</body>\n</html>\n");
    Ok(())
}

fn render_grades(html: &mut String, report: &EvaluationReport) -> fmt::Result {
    html.push_str("<h2>4. PEC-PCD</h2>\n<table>\n<tr>");
    for g in &report.grades {
        write!(html, "<th>{}</th>", escape_html(&g.scale_label))?;
    }
    html.push_str("</tr>\n<tr>");
    for g in &report.grades {
        write!(html, "<td>{}</td>", g.grade)?;
    }
    html.push_str("</tr>\n</table>\n");
    Ok(())
}

/// Échappe une chaîne pour HTML (entités nommées pour les lettres accentuées courantes)
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match named_entity(c) {
            Some(entity) => {
                result.push('&');
                result.push_str(entity);
                result.push(';');
            }
            None if c.is_ascii() => result.push(c),
            None => {
                result.push_str(&format!("&#{};", c as u32));
            }
        }
    }
    result
}

fn named_entity(c: char) -> Option<&'static str> {
    Some(match c {
        '&' => "amp",
        '<' => "lt",
        '>' => "gt",
        '"' | '\u{201D}' => "quot",
        '\'' => "apos",
        'Á' => "Aacute",
        'á' => "aacute",
        'Â' => "Acirc",
        'â' => "acirc",
        'À' => "Agrave",
        'à' => "agrave",
        'Ã' => "Atilde",
        'ã' => "atilde",
        'Ä' => "Auml",
        'ä' => "auml",
        'É' => "Eacute",
        'é' => "eacute",
        'Ê' => "Ecirc",
        'ê' => "ecirc",
        'È' => "Egrave",
        'è' => "egrave",
        'Í' => "Iacute",
        'í' => "iacute",
        'Î' => "Icirc",
        'î' => "icirc",
        'Ó' => "Oacute",
        'ó' => "oacute",
        'Ô' => "Ocirc",
        'ô' => "ocirc",
        'Õ' => "Otilde",
        'õ' => "otilde",
        'Ú' => "Uacute",
        'ú' => "uacute",
        'Ü' => "Uuml",
        'ü' => "uuml",
        'Ç' => "Ccedil",
        'ç' => "ccedil",
        'Ñ' => "Ntilde",
        'ñ' => "ntilde",
        'ª' => "ordf",
        'º' => "ordm",
        '°' => "deg",
        '©' => "copy",
        '®' => "reg",
        _ => return None,
    })
}
