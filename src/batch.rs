//! Parallel reconstruction of many pages.
//!
//! Pages are independent, so a batch fans them out over a dedicated rayon
//! pool of `batch_concurrency` workers. Results always come back in input
//! order.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::cache::{CacheKey, ReconstructionCache};
use crate::error::{Result, Warning};
use crate::input::{SourceDocument, SourcePage};
use crate::layout::{LayoutOptions, Reconstruction, Reconstructor};
use crate::model::Document;

/// A warning tagged with the 1-indexed page it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageWarning {
    /// Page number (1-indexed)
    pub page: usize,
    /// The warning
    pub warning: Warning,
}

/// A reconstructed document and every warning raised along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutput {
    /// Reconstructed pages in input order
    pub document: Document,
    /// Warnings in page order
    pub warnings: Vec<PageWarning>,
}

/// Reconstructs pages with bounded parallelism.
pub struct BatchProcessor {
    reconstructor: Reconstructor,
    cache: Option<Arc<ReconstructionCache>>,
    pool: Option<rayon::ThreadPool>,
}

impl BatchProcessor {
    /// Create a processor around a configured reconstructor.
    ///
    /// Fails if the reconstructor's options are out of range or the worker
    /// pool cannot be started.
    pub fn new(reconstructor: Reconstructor) -> Result<Self> {
        let options = reconstructor.options();
        options.validate()?;

        let pool = if options.batch_concurrency > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(options.batch_concurrency)
                .thread_name(|i| format!("readflow-worker-{}", i))
                .build()?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            reconstructor,
            cache: None,
            pool,
        })
    }

    /// Create a processor with the default heuristic classifier.
    pub fn with_options(options: LayoutOptions) -> Result<Self> {
        Self::new(Reconstructor::with_options(options))
    }

    /// Share a cache across batches.
    pub fn with_cache(mut self, cache: Arc<ReconstructionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Number of pages processed at once.
    pub fn concurrency(&self) -> usize {
        self.pool.as_ref().map_or(1, |p| p.current_num_threads())
    }

    /// The reconstructor used for every page.
    pub fn reconstructor(&self) -> &Reconstructor {
        &self.reconstructor
    }

    /// Reconstruct a single page, consulting the cache when one is set.
    pub fn reconstruct_page(&self, page: &SourcePage) -> Reconstruction {
        let Some(cache) = &self.cache else {
            return self.reconstructor.reconstruct(page);
        };

        let key = CacheKey::for_page(page, self.reconstructor.options());
        let shared = cache.get_or_insert_with(key, || self.reconstructor.reconstruct(page));
        Reconstruction::clone(&shared)
    }

    /// Reconstruct pages in parallel, preserving input order.
    pub fn process(&self, pages: &[SourcePage]) -> Vec<Reconstruction> {
        self.process_with_progress(pages, |_, _| {})
    }

    /// Like [`process`](Self::process), calling `progress(done, total)` as
    /// each page finishes. Calls may arrive from any worker thread.
    pub fn process_with_progress<F>(&self, pages: &[SourcePage], progress: F) -> Vec<Reconstruction>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let total = pages.len();
        let done = AtomicUsize::new(0);
        let run = |page: &SourcePage| {
            let result = self.reconstruct_page(page);
            progress(done.fetch_add(1, Ordering::Relaxed) + 1, total);
            result
        };

        log::debug!(
            "Reconstructing {} pages with concurrency {}",
            total,
            self.concurrency()
        );

        match &self.pool {
            Some(pool) => pool.install(|| pages.par_iter().map(run).collect()),
            None => pages.iter().map(run).collect(),
        }
    }

    /// Reconstruct a whole document.
    pub fn process_document(&self, source: &SourceDocument) -> BatchOutput {
        self.process_document_with_progress(source, |_, _| {})
    }

    /// Reconstruct a whole document, reporting progress per page.
    pub fn process_document_with_progress<F>(&self, source: &SourceDocument, progress: F) -> BatchOutput
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let results = self.process_with_progress(&source.pages, progress);

        let mut document = Document::new();
        let mut warnings = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            warnings.extend(result.warnings.into_iter().map(|warning| PageWarning {
                page: index + 1,
                warning,
            }));
            document.add_page(result.page);
        }

        if !warnings.is_empty() {
            log::info!("Reconstruction finished with {} warnings", warnings.len());
        }

        BatchOutput { document, warnings }
    }
}

impl fmt::Debug for BatchProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchProcessor")
            .field("reconstructor", &self.reconstructor)
            .field("concurrency", &self.concurrency())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::RawFragment;
    use std::sync::Mutex;

    fn numbered_pages(count: usize) -> Vec<SourcePage> {
        (0..count)
            .map(|i| {
                SourcePage::new(
                    600.0,
                    800.0,
                    vec![RawFragment::new(format!("Page {}.", i), 10.0, 10.0)],
                )
            })
            .collect()
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let result = BatchProcessor::with_options(LayoutOptions::new().with_concurrency(0));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_sequential_has_no_pool() {
        let processor = BatchProcessor::with_options(LayoutOptions::new().sequential()).unwrap();
        assert_eq!(processor.concurrency(), 1);
    }

    #[test]
    fn test_output_order_matches_input() {
        let pages = numbered_pages(16);
        let processor = BatchProcessor::with_options(LayoutOptions::new().with_concurrency(4)).unwrap();
        assert_eq!(processor.concurrency(), 4);

        let results = processor.process(&pages);
        let texts: Vec<String> = results.iter().map(|r| r.page.plain_text()).collect();
        let expected: Vec<String> = (0..16).map(|i| format!("Page {}.", i)).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn test_progress_reaches_total() {
        let pages = numbered_pages(5);
        let processor = BatchProcessor::with_options(LayoutOptions::default()).unwrap();
        let seen = Mutex::new(Vec::new());

        processor.process_with_progress(&pages, |done, total| {
            seen.lock().unwrap().push((done, total));
        });

        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, (1..=5).map(|d| (d, 5)).collect::<Vec<_>>());
    }

    #[test]
    fn test_cache_is_used_for_repeated_pages() {
        let cache = Arc::new(ReconstructionCache::new(8));
        let processor = BatchProcessor::with_options(LayoutOptions::new().sequential())
            .unwrap()
            .with_cache(Arc::clone(&cache));
        let page = numbered_pages(1).remove(0);

        let first = processor.process(&[page.clone(), page]);
        assert_eq!(first[0], first[1]);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_document_warnings_are_tagged_with_page() {
        let source = SourceDocument::new(vec![
            numbered_pages(1).remove(0),
            SourcePage::new(600.0, 800.0, Vec::new()),
        ]);
        let output = BatchProcessor::with_options(LayoutOptions::default())
            .unwrap()
            .process_document(&source);

        assert_eq!(output.document.page_count(), 2);
        assert_eq!(
            output.warnings,
            vec![PageWarning {
                page: 2,
                warning: Warning::EmptyInput
            }]
        );
    }
}
