/// One session per server process; concurrent requests are serialized on the lock.
#[derive(Clone)]
struct AppState {
    inner: Arc<Mutex<DilemmaApi>>,
}

impl AppState {
    fn new(api: DilemmaApi) -> Self {
        Self {
            inner: Arc::new(Mutex::new(api)),
        }
    }
}
