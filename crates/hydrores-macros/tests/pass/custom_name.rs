use hydrores_macros::Fluxes;

#[derive(Debug, Clone, Copy, Fluxes)]
#[fluxes(timeseries_name = "Hydrograph")]
pub struct Sample {
    pub hour: f64,
    pub discharge: f64,
}

fn main() {
    let f = Sample { hour: 1.0, discharge: 50.0 };
    let mut ts = Hydrograph::with_capacity(5);
    ts.push(&f);
    assert_eq!(ts.len(), 1);
    assert_eq!(Sample::field_names(), &["hour", "discharge"]);
}
