use std::time::Duration;

use yield_to_main::yield_to_main;

async fn heavy_task(items: Vec<u64>) -> Result<u64, yield_to_main::YieldError> {
    let mut sum = 0;
    for (i, item) in items.into_iter().enumerate() {
        if i % 1000 == 0 {
            yield_to_main().await?;
        }
        sum += item * item;
    }
    Ok(sum)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let ticker = tokio::spawn(async {
        for i in 0..5 {
            println!("Tick {i}");
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    });

    let sum = heavy_task((0..200_000).collect()).await.unwrap();
    println!("Sum of squares: {sum}");

    ticker.await.unwrap();
}
