//! Double dispatch over [`Message`] kinds.

use crate::kinds::*;
use crate::message::ServiceMessage;

/// One method per message kind, all of which do nothing by default.
///
/// [`Message::accept`] calls exactly one of them. Generic messages, and
/// `internalError`, go to [`Visitor::visit_service_message`].
#[allow(unused_variables)]
pub trait Visitor {
    fn visit_progress_message(&mut self, message: &ProgressMessage) {}

    fn visit_progress_start(&mut self, message: &ProgressStart) {}

    fn visit_progress_finish(&mut self, message: &ProgressFinish) {}

    fn visit_publish_artifacts(&mut self, message: &PublishArtifacts) {}

    fn visit_test_suite_started(&mut self, message: &TestSuiteStarted) {}

    fn visit_test_suite_finished(&mut self, message: &TestSuiteFinished) {}

    fn visit_test_started(&mut self, message: &TestStarted) {}

    fn visit_test_failed(&mut self, message: &TestFailed) {}

    fn visit_test_finished(&mut self, message: &TestFinished) {}

    fn visit_test_ignored(&mut self, message: &TestIgnored) {}

    fn visit_test_std_out(&mut self, message: &TestStdOut) {}

    fn visit_test_std_err(&mut self, message: &TestStdErr) {}

    fn visit_build_status(&mut self, message: &BuildStatus) {}

    fn visit_build_number(&mut self, message: &BuildNumber) {}

    fn visit_build_statistic_value(&mut self, message: &BuildStatisticValue) {}

    fn visit_test_navigation_info(&mut self, message: &TestNavigationInfo) {}

    fn visit_block_opened(&mut self, message: &BlockOpened) {}

    fn visit_block_closed(&mut self, message: &BlockClosed) {}

    fn visit_compilation_started(&mut self, message: &CompilationStarted) {}

    fn visit_compilation_finished(&mut self, message: &CompilationFinished) {}

    fn visit_message_with_status(&mut self, message: &MessageWithStatus) {}

    fn visit_service_message(&mut self, message: &ServiceMessage) {}
}

impl Message {
    /// Call the visitor method matching this message's kind.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Message::ProgressMessage(m) => visitor.visit_progress_message(m),
            Message::ProgressStart(m) => visitor.visit_progress_start(m),
            Message::ProgressFinish(m) => visitor.visit_progress_finish(m),
            Message::PublishArtifacts(m) => visitor.visit_publish_artifacts(m),
            Message::TestSuiteStarted(m) => visitor.visit_test_suite_started(m),
            Message::TestSuiteFinished(m) => visitor.visit_test_suite_finished(m),
            Message::TestStarted(m) => visitor.visit_test_started(m),
            Message::TestFailed(m) => visitor.visit_test_failed(m),
            Message::TestFinished(m) => visitor.visit_test_finished(m),
            Message::TestIgnored(m) => visitor.visit_test_ignored(m),
            Message::TestStdOut(m) => visitor.visit_test_std_out(m),
            Message::TestStdErr(m) => visitor.visit_test_std_err(m),
            Message::BuildStatus(m) => visitor.visit_build_status(m),
            Message::BuildNumber(m) => visitor.visit_build_number(m),
            Message::BuildStatisticValue(m) => visitor.visit_build_statistic_value(m),
            Message::TestNavigationInfo(m) => visitor.visit_test_navigation_info(m),
            Message::BlockOpened(m) => visitor.visit_block_opened(m),
            Message::BlockClosed(m) => visitor.visit_block_closed(m),
            Message::CompilationStarted(m) => visitor.visit_compilation_started(m),
            Message::CompilationFinished(m) => visitor.visit_compilation_finished(m),
            Message::MessageWithStatus(m) => visitor.visit_message_with_status(m),
            Message::InternalError(m) => visitor.visit_service_message(m),
            Message::Generic(m) => visitor.visit_service_message(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_span;

    #[derive(Default)]
    struct Calls(Vec<&'static str>);

    impl Visitor for Calls {
        fn visit_test_started(&mut self, _message: &TestStarted) {
            self.0.push("testStarted");
        }

        fn visit_block_opened(&mut self, _message: &BlockOpened) {
            self.0.push("blockOpened");
        }

        fn visit_service_message(&mut self, _message: &ServiceMessage) {
            self.0.push("generic");
        }
    }

    #[test]
    fn exactly_one_method() {
        let mut calls = Calls::default();
        for span in [
            "testStarted name='a'",
            "blockOpened name='b'",
            "testFinished name='a'",
            "somethingElse",
            "internalError cause='x'",
        ] {
            parse_span(span).unwrap().accept(&mut calls);
        }

        assert_eq!(
            calls.0,
            vec!["testStarted", "blockOpened", "generic", "generic"]
        );
    }

    #[test]
    fn dyn_visitor() {
        let mut calls = Calls::default();
        let visitor: &mut dyn Visitor = &mut calls;
        Message::from(TestStarted::new("t", false, None)).accept(visitor);
        assert_eq!(calls.0, vec!["testStarted"]);
    }
}
