//! The fixed set of LTE KPIs the tool knows how to pivot.

/// Recognized KPI column names, in report order.
pub const KPI_CATALOG: [&str; 13] = [
    "Cell Avail excl BLU",
    "Total E-UTRAN RRC conn stp SR",
    "E-UTRAN E-RAB stp SR",
    "E-RAB DR RAN",
    "E-UTRAN Avg PRB usage per TTI DL",
    "Average CQI",
    "Avg RRC conn UE",
    "Avg IP thp DL QCI9",
    "Total LTE data volume, DL + UL",
    "Avg UE distance",
    "Intra eNB HO SR",
    "E-UTRAN Intra-Freq HO SR",
    "E-UTRAN Inter-Freq HO SR",
];

/// Catalog KPIs present in `columns`, in catalog order. Matching is exact.
pub fn eligible_kpis<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    KPI_CATALOG
        .iter()
        .filter(|kpi| columns.iter().any(|c| c.as_ref() == **kpi))
        .map(|kpi| kpi.to_string())
        .collect()
}

/// Catalog KPIs absent from `columns`, in catalog order.
pub fn missing_kpis<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    KPI_CATALOG
        .iter()
        .filter(|kpi| !columns.iter().any(|c| c.as_ref() == **kpi))
        .map(|kpi| kpi.to_string())
        .collect()
}
