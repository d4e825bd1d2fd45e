use yield_to_main::{TokioYield, host, yield_to_main};

#[tokio::main]
async fn main() {
    let yielding = yield_to_main();
    println!("Without native facility, native = {}", yielding.is_native());
    yielding.await.unwrap();

    host::global().install_native(TokioYield);
    let yielding = yield_to_main();
    println!("With tokio facility, native = {}", yielding.is_native());
    yielding.await.unwrap();

    host::global().remove_native();
    let yielding = yield_to_main();
    println!("After removal, native = {}", yielding.is_native());
    yielding.await.unwrap();
}
