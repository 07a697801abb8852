//! Mock exposed-function registry.

use std::collections::BTreeMap;

use ddf_api::{DeviceHandle, DriverError, FunctionHandle, FunctionRegistry};

#[derive(Debug)]
struct Function {
    device: DeviceHandle,
    name: String,
    categories: Vec<String>,
}

/// Function registry that keeps exposed functions in memory.
#[derive(Debug, Default)]
pub struct MockFunctions {
    exposed: BTreeMap<FunctionHandle, Function>,
    fail_expose: BTreeMap<String, DriverError>,
    fail_category: Option<DriverError>,
    unexposed: Vec<String>,
    next_handle: u64,
}

impl MockFunctions {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes exposing a function called `name` fail with `err`.
    pub fn fail_expose(&mut self, name: &str, err: DriverError) {
        self.fail_expose.insert(name.to_owned(), err);
    }

    /// Makes every category addition fail with `err`.
    pub fn fail_category(&mut self, err: DriverError) {
        self.fail_category = Some(err);
    }

    /// Whether a function called `name` is currently exposed.
    #[must_use]
    pub fn is_exposed(&self, name: &str) -> bool {
        self.exposed.values().any(|fun| fun.name == name)
    }

    /// Names of the functions exposed under `device`, in exposure order.
    #[must_use]
    pub fn exposed_by(&self, device: DeviceHandle) -> Vec<String> {
        self.exposed
            .values()
            .filter(|fun| fun.device == device)
            .map(|fun| fun.name.clone())
            .collect()
    }

    /// Number of currently exposed functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exposed.len()
    }

    /// Whether nothing is exposed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exposed.is_empty()
    }

    /// Categories of the exposed function called `name`.
    #[must_use]
    pub fn categories(&self, name: &str) -> Vec<String> {
        self.exposed
            .values()
            .filter(|fun| fun.name == name)
            .flat_map(|fun| fun.categories.iter().cloned())
            .collect()
    }

    /// Names of unexposed functions, in order.
    #[must_use]
    pub fn unexposed(&self) -> &[String] {
        &self.unexposed
    }
}

impl FunctionRegistry for MockFunctions {
    fn expose(&mut self, device: DeviceHandle, name: &str) -> Result<FunctionHandle, DriverError> {
        if let Some(&err) = self.fail_expose.get(name) {
            return Err(err);
        }
        self.next_handle += 1;
        let handle = FunctionHandle(self.next_handle);
        self.exposed.insert(
            handle,
            Function {
                device,
                name: name.to_owned(),
                categories: Vec::new(),
            },
        );
        Ok(handle)
    }

    fn add_to_category(
        &mut self,
        function: FunctionHandle,
        category: &str,
    ) -> Result<(), DriverError> {
        if let Some(err) = self.fail_category {
            return Err(err);
        }
        let fun = self
            .exposed
            .get_mut(&function)
            .ok_or(DriverError::DeviceNotFound)?;
        fun.categories.push(category.to_owned());
        Ok(())
    }

    fn unexpose(&mut self, function: FunctionHandle) {
        if let Some(fun) = self.exposed.remove(&function) {
            self.unexposed.push(fun.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expose_category_unexpose() {
        let mut functions = MockFunctions::new();
        let pcm = functions.expose(DeviceHandle(1), "pcm").unwrap();
        functions.add_to_category(pcm, "audio-pcm").unwrap();
        assert!(functions.is_exposed("pcm"));
        assert_eq!(functions.categories("pcm"), vec!["audio-pcm".to_owned()]);

        functions.unexpose(pcm);
        functions.unexpose(pcm);
        assert!(functions.is_empty());
        assert_eq!(functions.unexposed(), &["pcm".to_owned()]);
        assert_eq!(
            functions.add_to_category(pcm, "audio-pcm"),
            Err(DriverError::DeviceNotFound)
        );
    }

    #[test]
    fn injected_failures() {
        let mut functions = MockFunctions::new();
        functions.fail_expose("midi", DriverError::OutOfMemory);
        assert_eq!(
            functions.expose(DeviceHandle(1), "midi"),
            Err(DriverError::OutOfMemory)
        );
        assert!(functions.expose(DeviceHandle(1), "pcm").is_ok());
        assert_eq!(functions.exposed_by(DeviceHandle(1)), vec!["pcm".to_owned()]);
    }
}
