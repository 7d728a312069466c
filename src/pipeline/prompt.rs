//! Analysis prompt assembly.

use crate::extraction::Question;
use crate::retrieval::AnalysisContext;

pub const GROUNDED_BAND: &str =
    "USA IL CONTESTO DEL DOCUMENTO per dare risposte accurate con percentuali 85-100%";
pub const GENERAL_BAND: &str =
    "Senza documento, usa conoscenza generale con percentuali 40-70%";

const NO_CONTEXT_NOTE: &str =
    "NOTA: Nessun contesto documento disponibile. Usa la tua conoscenza generale.\n\n";

fn context_preamble(context: &AnalysisContext) -> String {
    format!(
        "IMPORTANTE: USA QUESTO CONTESTO DAL DOCUMENTO DEL CORSO:

{}

ISTRUZIONI CRITICHE:
- DEVI basare le tue risposte PRINCIPALMENTE sul contesto fornito sopra
- Quando trovi informazioni nel contesto, cita SEMPRE la pagina specifica
- Se una risposta è nel contesto, dai accuratezza 90-100%
- Se NON trovi info nel contesto, puoi usare conoscenza generale ma indica \"Fonte: Conoscenza generale\" con accuratezza 50-70%

",
        context.text()
    )
}

fn question_listing(questions: &[Question]) -> String {
    questions
        .iter()
        .map(|q| {
            let mut block = format!("\nQ{}: {}\n", q.number, q.text);
            for (label, option) in &q.options {
                block.push_str(&format!("{label}) {option}\n"));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn results_table(questions: &[Question]) -> String {
    let rows = questions
        .iter()
        .map(|q| {
            format!(
                "<tr>\n<td class=\"question-number\">{}</td>\n<td class=\"answer-letter\">[A/B/C/D]</td>\n<td class=\"accuracy-percentage\">[%]</td>\n</tr>",
                q.number
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<table class=\"quiz-results-table\">\n<thead>\n<tr>\n<th>N°</th>\n<th>Risposta</th>\n<th>Accuratezza</th>\n</tr>\n</thead>\n<tbody>\n{rows}\n</tbody>\n</table>"
    )
}

/// Builds the final-analysis prompt; the accuracy band depends on whether
/// `context` carries any fragment.
pub fn build_analysis_prompt(questions: &[Question], context: &AnalysisContext) -> String {
    let grounded = !context.is_empty();

    let preamble = if grounded {
        context_preamble(context)
    } else {
        NO_CONTEXT_NOTE.to_string()
    };
    let source = if grounded {
        "[Pagina X del documento]"
    } else {
        "Conoscenza generale"
    };
    let band = if grounded { GROUNDED_BAND } else { GENERAL_BAND };

    format!(
        "{preamble}Analizza il quiz e fornisci le risposte.

DOMANDE:
{listing}

GENERA:

1. TABELLA HTML:
{table}

2. ANALISI DETTAGLIATA per ogni domanda:
<div class=\"question-analysis\">
<h4>Domanda [numero]</h4>
<p class=\"question-text\">[testo domanda]</p>
<p class=\"answer-explanation\"><strong>Risposta: [lettera]</strong> - [spiegazione]</p>
<p class=\"source-info\">Fonte: {source}</p>
</div>

{band}",
        listing = question_listing(questions),
        table = results_table(questions),
    )
}
