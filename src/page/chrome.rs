use std::{sync::Arc, time::Duration};

use headless_chrome::Tab;
use log::debug;
use scraper::Html;

use super::Page;

impl Page for Arc<Tab> {
    fn wait_for(&self, selector: &str, timeout: Duration) -> anyhow::Result<()> {
        self.wait_for_element_with_custom_timeout(selector, timeout)?;
        Ok(())
    }

    fn text(&self, selector: &str, timeout: Duration) -> anyhow::Result<String> {
        let text = self
            .wait_for_element_with_custom_timeout(selector, timeout)?
            .get_inner_text()?;
        Ok(text.trim().to_owned())
    }

    fn attribute(
        &self,
        selector: &str,
        name: &str,
        timeout: Duration,
    ) -> anyhow::Result<Option<String>> {
        self.wait_for_element_with_custom_timeout(selector, timeout)?
            .get_attribute_value(name)
    }

    fn click(&self, selector: &str, timeout: Duration) -> anyhow::Result<()> {
        let element = self.wait_for_element_with_custom_timeout(selector, timeout)?;
        if let Err(e) = element.click() {
            debug!("Native click on {selector:?} failed ({e}); clicking from script");
            element.call_js_fn("function() { this.click(); }", vec![], false)?;
        }
        Ok(())
    }

    fn snapshot(&self) -> anyhow::Result<Html> {
        Ok(Html::parse_document(&self.get_content()?))
    }

    fn url(&self) -> String {
        self.get_url()
    }
}
