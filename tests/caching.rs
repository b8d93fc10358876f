use std::cell::RefCell;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rpm_evr::{
    CheckUpdateOutput, DEFAULT_PACKAGE_COMMAND, Error, RepoQuery, VersionCache, latest_version,
};

mod common;

#[test]
fn test_latest_is_cached_per_query() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();

    let recorded = common::recorded_fetcher(100, common::check_update_el7_path());
    let commands = RefCell::new(Vec::new());
    let fetcher = |query: &RepoQuery| -> io::Result<CheckUpdateOutput> {
        commands
            .borrow_mut()
            .push(query.check_update_args(DEFAULT_PACKAGE_COMMAND).join(" "));
        recorded(query)
    };

    let cache = VersionCache::new();
    let updates = RepoQuery::new().enable_repo("updates");

    let kernel = cache
        .latest("kernel", &updates, &fetcher)?
        .ok_or("no kernel update")?;
    let kernel_again = cache
        .latest("kernel", &updates, &fetcher)?
        .ok_or("no kernel update")?;
    assert!(Arc::ptr_eq(&kernel, &kernel_again));
    assert_eq!("1160.119.1.el7", kernel.release());

    // other packages come out of the same run
    assert!(cache.latest("bash", &updates, &fetcher)?.is_some());
    assert_eq!(None, cache.latest("zlib", &updates, &fetcher)?);
    assert_eq!(vec!["yum check-update --enablerepo=updates"], *commands.borrow());

    let testing = RepoQuery::new()
        .enable_repo("updates")
        .disable_repo("base")
        .disable_excludes("all");
    cache.latest("kernel", &testing, &fetcher)?;
    assert_eq!(2, commands.borrow().len());
    assert_eq!(
        "yum check-update --enablerepo=updates --disablerepo=base --disableexcludes=all",
        commands.borrow()[1]
    );

    cache.reset();
    let kernel_after_reset = cache
        .latest("kernel", &updates, &fetcher)?
        .ok_or("no kernel update")?;
    assert_eq!(3, commands.borrow().len());
    assert!(!Arc::ptr_eq(&kernel, &kernel_after_reset));
    assert_eq!(kernel, kernel_after_reset);
    Ok(())
}

#[test]
fn test_failed_check_update_means_no_updates() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();

    let cache = VersionCache::new();
    let query = RepoQuery::new();

    // exit status 1 is a soft failure, whatever got printed
    let failed = common::recorded_fetcher(1, common::check_update_el7_path());
    assert_eq!(None, cache.latest("kernel", &query, &failed)?);

    // and it is cached like any other answer
    let succeeded = common::recorded_fetcher(100, common::check_update_el7_path());
    assert_eq!(None, cache.latest("kernel", &query, &succeeded)?);

    cache.reset();
    assert!(cache.latest("kernel", &query, &succeeded)?.is_some());
    Ok(())
}

#[test]
fn test_latest_version() -> Result<(), Box<dyn std::error::Error>> {
    let cache = VersionCache::new();
    let query = RepoQuery::new();
    let fetcher = common::recorded_fetcher(100, common::check_update_el7_path());

    assert_eq!(
        "2:7.4.629-8.el7_9",
        latest_version(
            &cache,
            "vim-enhanced",
            &query,
            Some("2:7.4.629-7.el7"),
            &fetcher
        )?
    );
    assert_eq!(
        "1.2.7-21.el7_9",
        latest_version(&cache, "zlib", &query, Some("1.2.7-21.el7_9"), &fetcher)?
    );
    assert!(matches!(
        latest_version(&cache, "zlib", &query, None, &fetcher),
        Err(Error::NotInstalled(package)) if package == "zlib"
    ));
    Ok(())
}

#[test]
fn test_unparseable_output_is_an_error() {
    let cache = VersionCache::new();
    let query = RepoQuery::new();
    let fetcher = common::recorded_fetcher(100, common::check_update_malformed_path());

    assert!(matches!(
        cache.latest("bash", &query, &fetcher),
        Err(Error::MalformedUpdate { .. })
    ));

    let missing =
        common::recorded_fetcher(100, common::cargo_manifest_dir().join("no_such_file"));
    assert!(matches!(
        cache.latest("bash", &query, &missing),
        Err(Error::Fetch(_))
    ));
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_cache_is_shareable() {
    assert_send_sync::<VersionCache>();
    assert_send_sync::<RepoQuery>();
}

#[test]
fn test_concurrent_lookups_fetch_once() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();

    let calls = AtomicUsize::new(0);
    let recorded = common::recorded_fetcher(100, common::check_update_el7_path());
    let fetcher = |query: &RepoQuery| -> io::Result<CheckUpdateOutput> {
        calls.fetch_add(1, Ordering::SeqCst);
        // keep the other threads waiting on the lock
        thread::sleep(Duration::from_millis(20));
        recorded(query)
    };
    let cache = VersionCache::new();
    let query = RepoQuery::new().enable_repo("updates");

    let (cache, query, fetcher) = (&cache, &query, &fetcher);
    let kernels = thread::scope(|scope| {
        let handles = (0..8)
            .map(|_| scope.spawn(move || cache.latest("kernel", query, fetcher)))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("lookup thread panicked"))
            .collect::<Result<Vec<_>, _>>()
    })?;

    assert_eq!(1, calls.load(Ordering::SeqCst));
    assert_eq!(8, kernels.len());
    let first = kernels[0].as_ref().ok_or("no kernel update")?;
    for kernel in &kernels {
        assert!(matches!(kernel, Some(kernel) if Arc::ptr_eq(first, kernel)));
    }
    Ok(())
}
