use macro_rules_attribute::apply;
use smol::Timer;
use smol_macros::{Executor, main};
use std::time::Duration;
use yield_to_main::{Host, YieldExt};

async fn render() {
    println!("Rendering frame");
}

#[apply(main!)]
async fn main(ex: &Executor<'_>) {
    let host = Host::builder().pool_size(2).name_prefix("demo-resume-").build();

    ex.spawn(async {
        Timer::after(Duration::from_millis(2)).await;
        println!("Input handled");
    })
    .detach();

    for slice in 0..5 {
        host.yield_to_main().await.unwrap();
        println!("Work slice {slice}");
    }

    render().yield_first_on(&host).await.unwrap();
    Timer::after(Duration::from_millis(10)).await;
}
