use cache_event_queue::app::startup::startup;

fn main() {
    std::process::exit(startup());
}
