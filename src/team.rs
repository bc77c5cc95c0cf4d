/// Team still alive in the tournament, with its strength rating.
///
/// Ratings are on the 538 power-rating scale and are fixed for a run.
#[cfg_attr(feature = "python", pyo3::pyclass)]
#[derive(Clone, Debug, PartialEq)]
pub struct Team {
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub name: String,

    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub rating: f64,
}

impl Team {
    pub fn new(name: impl Into<String>, rating: f64) -> Self {
        Team {
            name: name.into(),
            rating,
        }
    }
}
