/// Spawns a dedicated named OS thread.
///
/// Every actor loop runs on one of these; the name shows up in panics and
/// debuggers.
pub fn spawn_named_thread<F, R>(name: impl Into<String>, f: F) -> std::io::Result<std::thread::JoinHandle<R>>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	let name = name.into();
	tracing::trace!(thread = %name, "worker.spawn_named_thread");
	std::thread::Builder::new().name(name).spawn(f)
}
