use hydrores_macros::Fluxes;

#[derive(Fluxes)]
pub struct Row {
    pub inflow: f64,
    pub steps: u32,
}

fn main() {}
