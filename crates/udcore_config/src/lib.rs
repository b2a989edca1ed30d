//! Tunable parameters for udcore components, bundled into `Default`-able structs the way
//! `re_data_store`'s `DataStoreConfig` bundles its tunables, rather than consulted from
//! environment variables (spec §6: "No environment variables are consulted by the core").

/// Tunables for [`udcore_jobs`]'s worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadPoolConfig {
    /// Number of worker threads spawned by `WorkerPool::create`.
    pub total_threads: usize,
    /// How long a worker blocks on the task semaphore before re-checking `is_running`, to permit
    /// shutdown polling.
    pub poll_timeout_ms: u64,
}

impl ThreadPoolConfig {
    pub const DEFAULT: Self = Self {
        total_threads: 4,
        poll_timeout_ms: 100,
    };
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tunables for the global thread cache (component C3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadCacheConfig {
    /// Maximum number of idle threads kept warm in the cache.
    pub capacity: usize,
    /// How long an idle cached thread waits before self-destructing.
    pub idle_timeout_ms: u64,
}

impl ThreadCacheConfig {
    pub const DEFAULT: Self = Self {
        capacity: 16,
        idle_timeout_ms: 30_000,
    };
}

impl Default for ThreadCacheConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tunables for [`udcore_chunked`]'s virtual chunked array (component C5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualArrayConfig {
    /// Number of elements per chunk. Must be a power of two.
    pub chunk_element_count: usize,
    /// Maximum number of chunks kept resident before the LRU eviction policy spills one to disk.
    pub max_chunks_in_mem: usize,
}

impl VirtualArrayConfig {
    pub const DEFAULT: Self = Self {
        chunk_element_count: 1024,
        max_chunks_in_mem: 16,
    };
}

impl Default for VirtualArrayConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tunables for [`udcore_image`]'s tiled streaming sampler (component C10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageStreamConfig {
    /// Soft cap, in bytes, on resident tile memory before `freeTiles` evicts LRU tiles.
    pub tile_cache_budget_bytes: usize,
    /// Edge length of a single tile, in texels. The format fixes this at 64.
    pub tile_size: u32,
}

impl ImageStreamConfig {
    pub const DEFAULT: Self = Self {
        tile_cache_budget_bytes: 64 * 1024 * 1024,
        tile_size: 64,
    };
}

impl Default for ImageStreamConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        assert_eq!(ThreadPoolConfig::default().total_threads, 4);
        assert_eq!(ThreadCacheConfig::default().capacity, 16);
        assert_eq!(VirtualArrayConfig::default().max_chunks_in_mem, 16);
        assert_eq!(ImageStreamConfig::default().tile_size, 64);
    }
}
