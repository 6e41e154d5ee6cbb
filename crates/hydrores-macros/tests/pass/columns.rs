use hydrores_macros::Fluxes;

#[derive(Debug, Clone, Copy, Fluxes)]
pub struct Row {
    #[column(header = "Q_in [m3/s]", decimals = 1)]
    pub inflow: f64,
    #[column(header = "Reservoir Volume [m3]", decimals = 0)]
    pub volume: f64,
    pub raw: f64,
}

fn main() {
    let r = Row { inflow: 12.345, volume: 1234.6, raw: 0.123456 };
    assert_eq!(Row::headers(), &["Q_in [m3/s]", "Reservoir Volume [m3]", "raw"]);
    assert_eq!(r.values(), [12.345, 1234.6, 0.123456]);
    assert_eq!(r.presented(), [12.3, 1235.0, 0.123456]);
}
