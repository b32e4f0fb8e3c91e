//! libavfilter function declarations
//!
//! Filter lookup and filter graph construction.

use super::types::*;
use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_uint, c_void};

// ============================================================================
// Opaque Types (filter-specific)
// ============================================================================

/// Opaque AVFilter structure (filter definition)
#[repr(C)]
pub struct AVFilter {
    _opaque: [u8; 0],
    _marker: std::marker::PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque AVFilterContext structure (filter instance)
#[repr(C)]
pub struct AVFilterContext {
    _opaque: [u8; 0],
    _marker: std::marker::PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque AVFilterGraph structure
#[repr(C)]
pub struct AVFilterGraph {
    _opaque: [u8; 0],
    _marker: std::marker::PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Linked list of graph inputs/outputs used by `avfilter_graph_parse_ptr`
#[repr(C)]
pub struct AVFilterInOut {
    /// Unique name for this input/output in the list
    pub name: *mut c_char,
    /// Filter context associated to this input/output
    pub filter_ctx: *mut AVFilterContext,
    /// Index of the filt_ctx pad to use for linking
    pub pad_idx: c_int,
    /// Next input/input in the list, NULL if this is the last
    pub next: *mut AVFilterInOut,
}

extern "C" {
    // ========================================================================
    // Library Information
    // ========================================================================

    /// Return the LIBAVFILTER_VERSION_INT constant of the linked library
    pub fn avfilter_version() -> c_uint;

    /// Return the build-time configuration of the linked library
    pub fn avfilter_configuration() -> *const c_char;

    /// Return the license of the linked library
    pub fn avfilter_license() -> *const c_char;

    // ========================================================================
    // Filter Lookup
    // ========================================================================

    /// Get a filter definition matching the given name, NULL if none
    pub fn avfilter_get_by_name(name: *const c_char) -> *const AVFilter;

    /// Iterate over all registered filters (opaque must point to NULL initially)
    pub fn av_filter_iterate(opaque: *mut *mut c_void) -> *const AVFilter;

    /// Number of pads in a filter's input or output list
    #[cfg(ffmpeg_filter_pad_count)]
    pub fn avfilter_filter_pad_count(filter: *const AVFilter, is_output: c_int) -> c_uint;

    // ========================================================================
    // Graph Lifecycle
    // ========================================================================

    /// Allocate a filter graph
    pub fn avfilter_graph_alloc() -> *mut AVFilterGraph;

    /// Free a graph, destroy its links, and set *graph to NULL
    pub fn avfilter_graph_free(graph: *mut *mut AVFilterGraph);

    /// Get a filter instance of the graph by its instance name, NULL if none
    pub fn avfilter_graph_get_filter(
        graph: *mut AVFilterGraph,
        name: *const c_char,
    ) -> *mut AVFilterContext;

    /// Create and add a filter instance into an existing graph
    ///
    /// # Arguments
    /// * `filt_ctx` - Receives the created filter context
    /// * `filt` - Filter definition
    /// * `name` - Instance name
    /// * `args` - Filter options string (can be NULL)
    /// * `opaque` - Passed to the filter's init callback
    /// * `graph_ctx` - Graph to add the instance to
    pub fn avfilter_graph_create_filter(
        filt_ctx: *mut *mut AVFilterContext,
        filt: *const AVFilter,
        name: *const c_char,
        args: *const c_char,
        opaque: *mut c_void,
        graph_ctx: *mut AVFilterGraph,
    ) -> c_int;

    /// Allocate a filter instance in a graph without initializing it
    pub fn avfilter_graph_alloc_filter(
        graph: *mut AVFilterGraph,
        filter: *const AVFilter,
        name: *const c_char,
    ) -> *mut AVFilterContext;

    /// Initialize a filter with options given as a string
    pub fn avfilter_init_str(ctx: *mut AVFilterContext, args: *const c_char) -> c_int;

    /// Link two filters together
    pub fn avfilter_link(
        src: *mut AVFilterContext,
        srcpad: c_uint,
        dst: *mut AVFilterContext,
        dstpad: c_uint,
    ) -> c_int;

    /// Check validity and configure all links and formats in the graph
    pub fn avfilter_graph_config(graphctx: *mut AVFilterGraph, log_ctx: *mut c_void) -> c_int;

    /// Add a graph described by a string to a graph
    pub fn avfilter_graph_parse_ptr(
        graph: *mut AVFilterGraph,
        filters: *const c_char,
        inputs: *mut *mut AVFilterInOut,
        outputs: *mut *mut AVFilterInOut,
        log_ctx: *mut c_void,
    ) -> c_int;

    /// Dump a graph into a human-readable string (free with av_free)
    pub fn avfilter_graph_dump(graph: *mut AVFilterGraph, options: *const c_char) -> *mut c_char;

    // ========================================================================
    // In/Out Lists
    // ========================================================================

    /// Allocate a single AVFilterInOut entry
    pub fn avfilter_inout_alloc() -> *mut AVFilterInOut;

    /// Free the supplied list and set *inout to NULL
    pub fn avfilter_inout_free(inout: *mut *mut AVFilterInOut);
}

/// Filter graph threading types
pub mod thread_type {
    use std::os::raw::c_int;

    /// Process multiple parts of the frame concurrently
    pub const SLICE: c_int = 1 << 0;
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Find a filter definition by name; NULL if unknown
pub fn find_filter(name: &str) -> *const AVFilter {
    match CString::new(name) {
        Ok(c_name) => unsafe { avfilter_get_by_name(c_name.as_ptr()) },
        Err(_) => std::ptr::null(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_major_matches_headers() {
        let runtime = unsafe { avfilter_version() };
        assert_eq!(
            runtime >> 16,
            crate::version::avfilter::LIBAVFILTER_VERSION_MAJOR
        );
    }

    #[test]
    fn test_find_filters() {
        let null = find_filter("null");
        assert!(!null.is_null());
        assert!(find_filter("no-such-filter").is_null());
    }

    #[test]
    fn test_graph_with_single_filter() {
        unsafe {
            let mut graph = avfilter_graph_alloc();
            assert!(!graph.is_null());

            let name = CString::new("passthrough").unwrap();
            let mut ctx: *mut AVFilterContext = std::ptr::null_mut();
            let ret = avfilter_graph_create_filter(
                &mut ctx,
                find_filter("anullsrc"),
                name.as_ptr(),
                std::ptr::null(),
                std::ptr::null_mut(),
                graph,
            );
            assert!(ret >= 0);
            assert!(!ctx.is_null());
            assert_eq!(avfilter_graph_get_filter(graph, name.as_ptr()), ctx);

            let missing = CString::new("missing").unwrap();
            assert!(avfilter_graph_get_filter(graph, missing.as_ptr()).is_null());

            avfilter_graph_free(&mut graph);
            assert!(graph.is_null());
        }
    }

    #[cfg(ffmpeg_filter_pad_count)]
    #[test]
    fn test_source_filter_pads() {
        let filter = find_filter("anullsrc");
        assert!(!filter.is_null());
        unsafe {
            assert_eq!(avfilter_filter_pad_count(filter, 0), 0);
            assert_eq!(avfilter_filter_pad_count(filter, 1), 1);
        }
    }
}
