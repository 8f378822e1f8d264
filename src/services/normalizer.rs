use serde_json::Value;

use crate::message::{ChatResponse, Grafico, ResponseKind, UpstreamResponse};

/// Chart family the frontend draws itself when no image is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
        }
    }
}

/// Outcome of chart inference for one response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartChoice {
    pub tipo_grafica: Option<String>,
    pub tiene_grafica: bool,
    pub grafica_base64: Option<String>,
}

// Shape heuristics, checked in order; the first predicate that matches
// decides. Small two-column breakdowns read as pie slices, dense series as
// lines, any other multi-row result as bars. Single-row or single-column
// data never earns a chart.
const SHAPE_RULES: &[(fn(usize, usize) -> bool, ChartKind)] = &[
    (small_two_column, ChartKind::Pie),
    (dense_series, ChartKind::Line),
    (multi_row, ChartKind::Bar),
];

fn small_two_column(rows: usize, cols: usize) -> bool {
    (2..=6).contains(&rows) && cols == 2
}

fn dense_series(rows: usize, _cols: usize) -> bool {
    rows > 10
}

fn multi_row(rows: usize, _cols: usize) -> bool {
    rows > 1
}

fn shape_chart(rows: usize, cols: usize) -> Option<ChartKind> {
    SHAPE_RULES
        .iter()
        .find(|(applies, _)| applies(rows, cols))
        .map(|&(_, kind)| kind)
}

/// Decides what chart, if any, the frontend should present.
///
/// An image attached by the upstream always wins and is forwarded verbatim,
/// label included. Otherwise the shape heuristics run for chart-requested
/// answers, and for tables with rows and at least two columns. The
/// chart-requested branch has no column gate; the table branch only
/// speculates when there is something tabular enough to plot.
pub fn decide_chart(
    tipo: ResponseKind,
    datos: &[Value],
    columnas: &[String],
    grafico: Option<&Grafico>,
) -> ChartChoice {
    if let Some(grafico) = grafico {
        if let Some(base64) = grafico.base64.as_deref().filter(|b| !b.is_empty()) {
            return ChartChoice {
                tipo_grafica: Some(grafico.tipo.clone()),
                tiene_grafica: true,
                grafica_base64: Some(base64.to_string()),
            };
        }
    }

    let rows = datos.len();
    let cols = columnas.len();

    let eligible = tipo == ResponseKind::Grafico
        || (tipo == ResponseKind::Tabla && rows > 0 && cols >= 2);

    if eligible {
        if let Some(kind) = shape_chart(rows, cols) {
            return ChartChoice {
                tipo_grafica: Some(kind.as_str().to_string()),
                tiene_grafica: false,
                grafica_base64: None,
            };
        }
    }

    ChartChoice::default()
}

/// Reshapes an upstream answer into the fixed frontend contract. Pure
/// aside from a debug log line; never fails.
pub fn normalize(upstream: UpstreamResponse, session_id: String) -> ChatResponse {
    let UpstreamResponse {
        exito,
        tipo,
        mensaje,
        datos,
        columnas,
        sql_generado,
        grafico,
    } = upstream;

    let total_filas = datos.len();
    let chart = decide_chart(tipo, &datos, &columnas, grafico.as_ref());

    tracing::debug!(
        ?tipo,
        total_filas,
        tiene_grafica = chart.tiene_grafica,
        tipo_grafica = chart.tipo_grafica.as_deref().unwrap_or("none"),
        "normalized upstream response"
    );

    ChatResponse {
        exito,
        session_id,
        mensaje,
        sql_generado,
        datos,
        columnas,
        total_filas,
        tipo_grafica: chart.tipo_grafica,
        tiene_grafica: chart.tiene_grafica,
        grafica_base64: chart.grafica_base64,
    }
}
