use hydrores_macros::Fluxes;

#[derive(Fluxes)]
pub struct Row {
    #[column(unit = "m3/s")]
    pub inflow: f64,
}

fn main() {}
