// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The capability interface a step adapter implements, plus the explicit
//! registry the step graph builder looks up modules by name in, in place
//! of dynamic module loading.

use crate::declare::{DeclareCtx, DeclareError};
use std::collections::HashMap;
use std::sync::Arc;
use uap_core::id::ModuleName;

/// A step adapter: declares the runs, outputs, and subprocess work for one
/// step given its options and assembled inputs. The real step library
/// (bowtie2, fastqc, ...) is out of scope for this core; adapters conforming
/// to this trait are its only contract with the engine.
pub trait StepAdapter: Send + Sync {
    fn declare(&self, ctx: &mut DeclareCtx<'_>) -> Result<(), DeclareError>;

    /// Tool ids this adapter's commands reference; must all be present in
    /// the configuration's `tools` table.
    fn required_tools(&self) -> &[&str] {
        &[]
    }

    /// CPU cores this step's tasks should be allocated (cluster `#{CORES}`
    /// template placeholder).
    fn cores(&self) -> u32 {
        1
    }

    /// Optional JSON Schema validating this adapter's options.
    fn options_schema(&self) -> Option<&serde_json::Value> {
        None
    }
}

type AdapterFactory = Arc<dyn Fn() -> Box<dyn StepAdapter> + Send + Sync>;

/// Explicit `module_name -> factory` registry, populated by `register()`
/// calls at program start.
#[derive(Clone, Default)]
pub struct StepRegistry {
    factories: HashMap<ModuleName, AdapterFactory>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, module_name: impl Into<ModuleName>, factory: F)
    where
        F: Fn() -> Box<dyn StepAdapter> + Send + Sync + 'static,
    {
        self.factories.insert(module_name.into(), Arc::new(factory));
    }

    pub fn create(&self, module_name: &ModuleName) -> Option<Box<dyn StepAdapter>> {
        self.factories.get(module_name).map(|f| f())
    }

    pub fn contains(&self, module_name: &ModuleName) -> bool {
        self.factories.contains_key(module_name)
    }
}

impl std::fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepRegistry")
            .field("modules", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    //! A test-only adapter whose declared runs are supplied verbatim by
    //! the test, standing in for the out-of-scope step library.

    use super::*;
    use uap_core::run::Run;

    /// An adapter that declares a fixed, caller-supplied list of [`Run`]s
    /// regardless of the assembled inputs it's handed.
    pub struct FakeAdapter {
        pub runs: Vec<Run>,
        pub required_tools: Vec<&'static str>,
        pub cores: u32,
    }

    impl FakeAdapter {
        pub fn new(runs: Vec<Run>) -> Self {
            Self {
                runs,
                required_tools: Vec::new(),
                cores: 1,
            }
        }
    }

    impl StepAdapter for FakeAdapter {
        fn declare(&self, ctx: &mut DeclareCtx<'_>) -> Result<(), DeclareError> {
            for run in &self.runs {
                let mut handle = ctx.declare_run(run.run_id.clone());
                for (tag, outputs) in &run.output_files {
                    for (path, inputs) in outputs {
                        #[allow(clippy::expect_used)]
                        let basename = path
                            .file_name()
                            .expect("fake run output path must have a file name")
                            .to_string_lossy()
                            .to_string();
                        handle.add_output_file(tag.clone(), &basename, inputs)?;
                    }
                }
                for tag in &run.empty_connections {
                    handle.add_empty_output_connection(tag.clone());
                }
                for group in &run.exec_groups {
                    *handle.new_exec_group() = group.clone();
                }
                handle.finish();
            }
            Ok(())
        }

        fn required_tools(&self) -> &[&str] {
            &self.required_tools
        }

        fn cores(&self) -> u32 {
            self.cores
        }
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
