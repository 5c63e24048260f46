use crate::client::CounterClient;
use metrics::CounterFn;
use std::sync::Arc;

pub(crate) struct CounterHandle<F> {
    pub(crate) name: String,
    pub(crate) key: u32,
    pub(crate) client: Arc<CounterClient>,
    pub(crate) err_cb: F,
}

impl<F> CounterHandle<F>
where
    F: Fn(&str),
{
    fn send(&self, op: &str, value: u64) {
        if let Err(e) = self.client.send_value(self.key, value) {
            (self.err_cb)(&format!(
                "Failed to send counter {} (key {}) for {}: {}",
                self.name, self.key, op, e
            ));
        }
    }
}

impl<F> CounterFn for CounterHandle<F>
where
    F: Fn(&str),
{
    fn increment(&self, value: u64) {
        self.send("increment", value);
    }

    fn absolute(&self, value: u64) {
        self.send("absolute", value);
    }
}
