use sequentis::time::sleep;
use sequentis::{Runner, Task, WorkQueue};
use std::fmt;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum Value {
    Number(f64),
    Text(&'static str),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

fn delayed(text: &'static str, secs: u64) -> Task<Value, &'static str> {
    Task::spawn(async move {
        sleep(Duration::from_secs(secs)).await;
        Ok(Value::Text(text))
    })
}

#[sequentis::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sequentis=debug")),
        )
        .init();

    let mut queue = WorkQueue::new();

    queue.add_value(Value::Number(std::f64::consts::PI));
    queue.add(delayed("Task 1", 1));
    queue.add(delayed("Task 2", 2));
    queue.add(delayed("Task 3", 3));

    match Runner::new()
        .run(&mut queue, |value| println!("{value}"))
        .await
    {
        Ok(drained) => info!(tasks = drained.tasks, "queue drained"),
        Err(error) => eprintln!("drain failed: {error}"),
    }
}
