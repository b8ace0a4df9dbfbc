use std::collections::BTreeMap;

/// Named stopwatches owned by one pet and advanced by every frame delta.
///
/// The controller never reads them; they exist for behavior hooks
/// (e.g. "seconds since the last bark").
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomTimers {
    elapsed: BTreeMap<String, f32>,
}

impl CustomTimers {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            elapsed: names
                .iter()
                .map(|name| (name.as_ref().to_owned(), 0.0))
                .collect(),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        for value in self.elapsed.values_mut() {
            *value += dt;
        }
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.elapsed.get(name).copied()
    }

    /// Restart one timer. Returns `false` if no timer has that name.
    pub fn reset(&mut self, name: &str) -> bool {
        match self.elapsed.get_mut(name) {
            Some(value) => {
                *value = 0.0;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.elapsed.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
