use hydrores_macros::Fluxes;

#[derive(Debug, Clone, Copy, Fluxes)]
pub struct TestFluxes {
    pub inflow: f64,
    pub outflow: f64,
    pub volume: f64,
}

fn main() {
    let f = TestFluxes { inflow: 1.0, outflow: 2.0, volume: 3.0 };
    let mut ts = TestFluxesTimeseries::with_capacity(10);
    ts.push(&f);
    assert_eq!(ts.len(), 1);
    assert!(!ts.is_empty());
    assert_eq!(TestFluxes::field_names(), &["inflow", "outflow", "volume"]);
    assert_eq!(TestFluxes::headers(), TestFluxes::field_names());
    assert_eq!(TestFluxes::N_COLUMNS, 3);
    assert_eq!(ts.get(0).map(|r| r.volume), Some(3.0));
    assert!(ts.get(1).is_none());
}
