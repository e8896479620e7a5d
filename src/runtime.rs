// Chart runtime: owns the dataset, the selection and the live render session

use crate::compiler::compile_chart;
use crate::criteria::Criteria;
use crate::csv_reader::Dataset;
use crate::interaction::{on_selector_click, ChartEvent};
use crate::ir::{Handler, Layout, RenderSession};
use crate::tooltip;
use anyhow::{anyhow, Context, Result};

pub struct ChartApp {
    data: Dataset,
    criteria: Criteria,
    layout: Layout,
    session: Option<RenderSession>,
    generation: u64,
}

impl ChartApp {
    pub fn new(data: Dataset, criteria: Criteria, layout: Layout) -> Self {
        ChartApp { data, criteria, layout, session: None, generation: 0 }
    }

    pub fn criteria(&self) -> Criteria {
        self.criteria
    }

    pub fn dataset(&self) -> &Dataset {
        &self.data
    }

    pub fn session(&self) -> Option<&RenderSession> {
        self.session.as_ref()
    }

    /// Rebuild the chart from scratch for the current selection.
    ///
    /// The previous session, tooltip included, is dropped only once the new one is built,
    /// so a failed render leaves the old chart on screen.
    pub fn render(&mut self) -> Result<&RenderSession> {
        let generation = self.generation + 1;
        let next = compile_chart(&mut self.data, self.criteria, &self.layout, generation)
            .with_context(|| format!("Failed to render chart ({})", self.criteria))?;

        if let Some(old) = self.session.take() {
            log::debug!("Tearing down render session {}", old.generation);
        }
        self.generation = generation;
        log::info!(
            "Rendered session {} ({}, {} points)",
            generation,
            self.criteria,
            next.markers.len()
        );
        Ok(&*self.session.insert(next))
    }

    /// Deliver one user event. Events are handled one at a time, to completion.
    pub fn dispatch(&mut self, event: &ChartEvent) -> Result<()> {
        log::debug!("Dispatching '{}'", event);

        let session = self
            .session
            .as_ref()
            .ok_or_else(|| anyhow!("No chart has been rendered yet"))?;

        let (target, trigger) = match event.route(session, &self.data)? {
            Some(routed) => routed,
            None => {
                self.render()?;
                return Ok(());
            }
        };

        let handler = session
            .handler_for(target, trigger)
            .ok_or_else(|| anyhow!("Nothing listens for {:?} on {:?}", trigger, target))?;

        match handler {
            Handler::SelectCriteria => {
                let next = on_selector_click(self.criteria, session, target)?;
                self.select(next)
            }
            Handler::ShowTooltip => {
                let session = self.session.as_mut().ok_or_else(|| anyhow!("No live session"))?;
                tooltip::show(session, &self.data, target)
            }
            Handler::HideTooltip => {
                if let Some(session) = self.session.as_mut() {
                    tooltip::hide(session);
                }
                Ok(())
            }
        }
    }

    /// Store the new selection, then render with it. Rolls back if the render fails.
    fn select(&mut self, next: Criteria) -> Result<()> {
        let previous = self.criteria;
        self.criteria = next;
        if let Err(e) = self.render() {
            self.criteria = previous;
            return Err(e);
        }
        Ok(())
    }
}
