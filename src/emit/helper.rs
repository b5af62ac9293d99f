//! The `jnihelper.h` support header included by proxies generated with
//! `use_jni_helper`.
//!
//! It provides three small RAII types in namespace `jnicpp`:
//!
//! * `Env` attaches the calling thread to the VM registered with
//!   `jnicpp::Env::init` and exposes its `JNIEnv*` through `get()` and
//!   `operator->`.
//! * `LocalRef<T>` owns a local reference and deletes it when dropped.
//! * `GlobalRef<T>` owns a global reference and deletes it when dropped.

use super::{GeneratedFile, NOTICE};

/// File name of the support header. Proxies include it by this name.
pub const JNI_HELPER_HEADER: &str = "jnihelper.h";

const BODY: &str = r#"/* Reference and environment helpers for generated C++ proxies */
#pragma once

#include <jni.h>
#include <assert.h>
#include <utility>

namespace jnicpp {

class Env {
public:
    // Must run once, typically from JNI_OnLoad, before any Env is created.
    static void init(JavaVM* vm) {
        javaVM() = vm;
    }

    Env() {
        JavaVM* vm = javaVM();
        assert(vm != nullptr);
        if (vm->GetEnv(reinterpret_cast<void**>(&_env), JNI_VERSION_1_6) == JNI_EDETACHED) {
            vm->AttachCurrentThread(reinterpret_cast<void**>(&_env), nullptr);
            _attached = true;
        }
    }

    ~Env() {
        if (_attached) {
            javaVM()->DetachCurrentThread();
        }
    }

    Env(const Env&) = delete;
    Env& operator=(const Env&) = delete;

    JNIEnv* get() const {
        return _env;
    }

    JNIEnv* operator->() const {
        return _env;
    }

private:
    static JavaVM*& javaVM() {
        static JavaVM* vm = nullptr;
        return vm;
    }

    JNIEnv* _env = nullptr;
    bool _attached = false;
};

template <typename T>
class LocalRef {
public:
    LocalRef() = default;

    explicit LocalRef(T ref) : _ref(ref) {}

    LocalRef(LocalRef&& other) noexcept : _ref(other.release()) {}

    LocalRef& operator=(LocalRef&& other) noexcept {
        if (this != &other) {
            reset(other.release());
        }
        return *this;
    }

    LocalRef(const LocalRef&) = delete;
    LocalRef& operator=(const LocalRef&) = delete;

    ~LocalRef() {
        reset();
    }

    T get() const {
        return _ref;
    }

    T release() {
        T ref = _ref;
        _ref = nullptr;
        return ref;
    }

    void reset(T ref = nullptr) {
        if (_ref != nullptr) {
            Env env;
            env->DeleteLocalRef(_ref);
        }
        _ref = ref;
    }

private:
    T _ref = nullptr;
};

template <typename T>
class GlobalRef {
public:
    GlobalRef() = default;

    explicit GlobalRef(const LocalRef<T>& local) : _ref(newGlobal(local.get())) {}

    GlobalRef(const GlobalRef& other) : _ref(newGlobal(other._ref)) {}

    GlobalRef& operator=(const GlobalRef& other) {
        if (this != &other) {
            reset(newGlobal(other._ref));
        }
        return *this;
    }

    GlobalRef(GlobalRef&& other) noexcept : _ref(other._ref) {
        other._ref = nullptr;
    }

    GlobalRef& operator=(GlobalRef&& other) noexcept {
        if (this != &other) {
            reset(other._ref);
            other._ref = nullptr;
        }
        return *this;
    }

    ~GlobalRef() {
        reset();
    }

    T get() const {
        return _ref;
    }

    void reset(T ref = nullptr) {
        if (_ref != nullptr) {
            Env env;
            env->DeleteGlobalRef(_ref);
        }
        _ref = ref;
    }

private:
    static T newGlobal(T ref) {
        if (ref == nullptr) {
            return nullptr;
        }
        Env env;
        return static_cast<T>(env->NewGlobalRef(ref));
    }

    T _ref = nullptr;
};

} // namespace jnicpp
"#;

/// Render the support header.
pub fn jni_helper_header() -> GeneratedFile {
    GeneratedFile {
        name: JNI_HELPER_HEADER.to_owned(),
        content: format!("{NOTICE}{BODY}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_what_proxies_use() {
        let file = jni_helper_header();
        assert_eq!(file.name, "jnihelper.h");
        assert!(file.content.starts_with(NOTICE));
        assert!(file.content.contains("#pragma once\n"));
        assert!(file.content.contains("namespace jnicpp {"));
        assert!(file.content.contains("class LocalRef {"));
        assert!(file.content.contains("class GlobalRef {"));
        assert!(file.content.contains("    JNIEnv* operator->() const {"));
        assert!(file.content.contains("    explicit GlobalRef(const LocalRef<T>& local)"));
        assert_eq!(file.content.matches("    T get() const {").count(), 2);
    }
}
