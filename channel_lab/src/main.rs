//! # Channel Lab - Entry Point
//! src/main.rs
//!
//! Corre cada demostración en orden e imprime un resumen corto de cada una.

use channel_lab::context::{self, Context};
use channel_lab::error::Result;
use channel_lab::fanout;
use channel_lab::leak::{self, TaskTracker};
use channel_lab::limiter;
use channel_lab::object_pool;
use channel_lab::patterns::{
    new_vehicle, total_area, BankAccount, Circle, Coffee, ComputerBuilder, Directory, File,
    FileSystemComponent, Goods, Inbox, Light, LightOffCommand, LightOnCommand, MilkDecorator,
    Notifier, OverseasProxy, Rectangle, Registry, RemoteControl, Shape, Shopping, ShoppingCart,
    SimpleCoffee, SugarDecorator, WeChatPay,
};
use channel_lab::pipeline;
use channel_lab::select::{self, RaceEvent};
use channel_lab::shared_state;
use channel_lab::telemetry::init_tracing;
use channel_lab::wait_group::WaitGroup;
use channel_lab::worker_pool;
use crossbeam::channel;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn section(title: &str) {
    println!("\n=== {} ===", title);
}

fn channels() -> Result<()> {
    section("Channels");
    let counts = fanout::fan_out(3, (1..=30).collect(), |_, _: u32| {
        thread::sleep(Duration::from_millis(1));
    })?;
    println!("📦 fan-out de 30 items: {:?}", counts);

    let outcome = fanout::ping("ping")?;
    println!("🏓 rendezvous: {} (emisor esperó: {})", outcome.value, outcome.sender_waited);

    let (drained, disconnected) = fanout::drain_after_close(vec![1, 2, 3]);
    println!("🚰 drenado tras cerrar: {:?}, desconectado: {}", drained, disconnected);
    Ok(())
}

fn pipelines_and_pools() -> Result<()> {
    section("Pipeline");
    println!("√(n²) de los pares: {:?}", pipeline::square_even_roots(1..=10)?);

    section("Worker pool");
    let report = worker_pool::double_all(3, (1..=9).collect())?;
    for (worker, result) in &report.results {
        println!("👷 worker {} → {}", worker, result);
    }
    println!("trabajos por worker: {:?}", report.per_worker);
    Ok(())
}

fn selects() {
    section("Select");
    let events = select::race(
        vec![
            ("one".to_string(), Duration::from_millis(100)),
            ("two".to_string(), Duration::from_millis(20)),
            ("three".to_string(), Duration::from_millis(900)),
        ],
        Duration::from_millis(300),
    );
    for event in events {
        match event {
            RaceEvent::Arrived(label) => println!("📨 llegó {}", label),
            RaceEvent::Timeout => println!("⏰ timeout"),
        }
    }

    let (tx, rx) = channel::bounded::<u64>(0);
    let (done_tx, done_rx) = channel::bounded::<()>(0);
    println!("try_take sobre canal vacío: {:?}", select::try_take(&rx));

    // El consumidor toma 5 valores y avisa con `done` soltando su extremo
    let sent = thread::scope(|s| {
        s.spawn(move || {
            let taken: Vec<u64> = rx.iter().take(5).collect();
            drop(done_tx);
            taken
        });
        select::produce_until_done(&tx, &done_rx, 10)
    });
    println!("enviados antes de done: {}", sent);
}

fn contexts() -> Result<()> {
    section("Context");
    let (ctx, _cancel) = Context::with_timeout(&Context::background(), Duration::from_millis(50));
    let exit = context::ticker(&ctx, Duration::from_millis(10));
    println!("⏱️  ticker: {} ticks, fin por {}", exit.ticks, exit.reason);

    for (worker, exit) in context::cancel_workers(3, Duration::from_millis(40)).iter().enumerate() {
        println!("🛑 worker {}: {} ticks ({})", worker, exit.ticks, exit.reason);
    }

    section("WaitGroup");
    let wg = WaitGroup::new();
    for id in 0..3 {
        let guard = wg.guard();
        thread::spawn(move || {
            let _guard = guard;
            thread::sleep(Duration::from_millis(10 * id));
        });
    }
    println!("todas las tareas terminaron: {}", wg.wait_timeout(Duration::from_secs(1)));

    section("Leaks");
    let tracker = TaskTracker::new();
    let (taken, rx) = leak::stalled_producer(&tracker, 3)?;
    println!("leídos {:?}; threads vivos: {}", taken, tracker.live());
    drop(rx);
    println!("tras soltar el receptor, idle: {}", tracker.wait_idle(Duration::from_secs(1)));
    println!("productor que cierra: {:?}", leak::closed_producer(&tracker, 5)?);
    Ok(())
}

fn counters() -> Result<()> {
    section("Shared state");
    println!("mutex:  {}", shared_state::mutex_counter(10, 1000)?);
    println!("atomic: {}", shared_state::atomic_counter(10, 1000));
    println!("rwlock: {} claves", shared_state::rw_fill(4, 100, 4));
    println!("once:   {} ejecución(es)", shared_state::once_runs(10));

    section("Object pool");
    let stats = object_pool::reuse_buffers(1000, 10);
    println!("♻️  creados: {}, reutilizados: {}", stats.created, stats.reused);

    section("Connection limiter");
    let report = limiter::connection_benchmark(5, 50)?;
    println!("🔌 {} conexiones, pico de {} simultáneas", report.handled, report.peak);
    Ok(())
}

fn patterns() -> Result<()> {
    section("Patterns");
    let mut notifier = Notifier::new();
    let inbox = Arc::new(Inbox::new("CNN"));
    notifier.add_listener(inbox.clone());
    notifier.notify("breaking news");
    println!("📰 {} recibió {:?}", inbox.name(), inbox.received());

    for goods in [Goods::new("face mask", true), Goods::new("CET4 certificate", false)] {
        match OverseasProxy::for_goods(&goods).buy(&goods) {
            Ok(purchase) => println!("🛍️  {:?}", purchase),
            Err(e) => println!("🚫 {}", e),
        }
    }

    let registry = Registry::instance(1);
    println!("registry seed: {} (segunda llamada: {})", registry.seed(), Registry::instance(2).seed());

    let mut cart = ShoppingCart::new();
    if let Err(e) = cart.checkout(10.0) {
        println!("🛒 {}", e);
    }
    cart.set_payment_strategy(Box::new(WeChatPay));
    println!("🛒 {}", cart.checkout(88.8)?);

    let coffee = SugarDecorator(MilkDecorator(SimpleCoffee));
    println!("☕ {} = {:.2}", coffee.description(), coffee.cost());

    let mut account = BankAccount::new("Ana", 1000.0);
    account.deposit(500.0)?;
    if let Err(e) = account.withdraw(5000.0) {
        println!("🏦 {}", e);
    }
    println!("🏦 {}: {:.2}", account.owner(), account.balance());

    let computer = ComputerBuilder::gaming().storage("4TB NVMe SSD").build();
    println!("🖥️  {:?}", computer);

    let mut home = Directory::new("home");
    home.add(Box::new(File::new("notes.txt", 4)));
    let mut photos = Directory::new("photos");
    photos.add(Box::new(File::new("cat.png", 512)));
    home.add(Box::new(photos));
    print!("{}", home.tree());
    println!("📁 total: {} KB", home.size());

    let light = Light::new("kitchen");
    let mut remote = RemoteControl::new();
    let on = remote.add_command(Box::new(LightOnCommand(light.clone())));
    remote.add_command(Box::new(LightOffCommand(light.clone())));
    remote.press_button(on);
    println!("💡 luz encendida: {}", light.is_on());

    let shapes: Vec<Box<dyn Shape>> = vec![
        Box::new(Circle { radius: 1.5 }),
        Box::new(Rectangle {
            width: 2.0,
            height: 3.0,
        }),
    ];
    println!("📐 área total: {:.2}", total_area(&shapes));
    for kind in ["car", "motorcycle", "boat"] {
        match new_vehicle(kind, "Honda") {
            Some(vehicle) => println!("🚗 {}", vehicle.drive()),
            None => println!("🚫 tipo desconocido: {}", kind),
        }
    }
    Ok(())
}

fn run() -> Result<()> {
    channels()?;
    pipelines_and_pools()?;
    selects();
    contexts()?;
    counters()?;
    patterns()
}

fn main() {
    init_tracing("channel_lab=warn");

    println!("=================================");
    println!("  Channel Lab - Concurrency Demos");
    println!("=================================");

    if let Err(e) = run() {
        tracing::error!(error = %e, "demo failed");
        std::process::exit(1);
    }
}
