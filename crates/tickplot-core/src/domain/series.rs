use serde::Serialize;

/// One observation taken from the provider's time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcPoint {
    pub label: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Parallel label/open/high/low/close sequences in provider order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesExtract {
    pub labels: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl SeriesExtract {
    pub fn push(&mut self, point: OhlcPoint) {
        self.labels.push(point.label);
        self.open.push(point.open);
        self.high.push(point.high);
        self.low.push(point.low);
        self.close.push(point.close);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl FromIterator<OhlcPoint> for SeriesExtract {
    fn from_iter<I: IntoIterator<Item = OhlcPoint>>(iter: I) -> Self {
        let mut extract = Self::default();
        for point in iter {
            extract.push(point);
        }
        extract
    }
}
