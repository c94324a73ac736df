/// Recommended error type for your benchmark `main` function and any shared code that you write
/// around the runner. Configuration and workload errors convert into it so you can use `?`.
pub type BenchResult<T> = anyhow::Result<T>;
